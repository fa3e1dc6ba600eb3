//! Descriptors for profile records
//!
//! Instances are JSON objects keyed by field name. Every field of a record
//! is present in every instance built here; absent values of nullable fields
//! are stored as `null`.

use super::{RecordSpec, ScalarKind};
use crate::descriptor::TypeDescriptor;
use crate::types::{FieldDescriptor, FieldType};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Live instance of a profile record
pub type DynamicRecord = Map<String, Value>;

/// Field metadata for one profile record
#[derive(Debug, Clone)]
pub struct DynamicDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
    kinds: Vec<ScalarKind>,
    initial: Vec<Value>,
}

impl DynamicDescriptor {
    /// Build a descriptor from a record declaration
    pub fn from_spec(spec: &RecordSpec) -> Result<Self> {
        let mut fields = Vec::with_capacity(spec.fields.len());
        let mut kinds = Vec::with_capacity(spec.fields.len());
        let mut initial = Vec::with_capacity(spec.fields.len());

        for field in &spec.fields {
            let (kind, nullable) = ScalarKind::parse_declared(&field.type_name)
                .map_err(|msg| Error::profile_at(msg, &spec.name, Some(field.name.as_str())))?;

            let mut descriptor =
                FieldDescriptor::new(&field.name, FieldType::scalar(kind, nullable), field.access);
            descriptor.correspondence = field.from.clone();

            let value = match &field.default {
                Some(value) => value.clone(),
                None if nullable => Value::Null,
                None => kind.default_value(),
            };

            fields.push(descriptor);
            kinds.push(kind);
            initial.push(value);
        }

        Ok(Self {
            name: spec.name.clone(),
            fields,
            kinds,
            initial,
        })
    }

    /// Parse a JSON object into an instance of this record.
    ///
    /// Keys missing from `value` take the field's initial value.
    pub fn instance_from_json(&self, value: &Value) -> Result<DynamicRecord> {
        let Value::Object(object) = value else {
            return Err(Error::InvalidInstance {
                record: self.name.clone(),
                field: None,
                message: format!("expected a JSON object, found {}", json_kind(value)),
            });
        };

        if let Some(unknown) = object.keys().find(|k| self.index_of(k).is_none()) {
            return Err(Error::InvalidInstance {
                record: self.name.clone(),
                field: Some(unknown.clone()),
                message: "no such field".to_string(),
            });
        }

        let mut instance = self.instantiate();
        for (index, field) in self.fields.iter().enumerate() {
            let Some(given) = object.get(&field.name) else {
                continue;
            };
            if given.is_null() && field.field_type.is_nullable() {
                instance.insert(field.name.clone(), Value::Null);
                continue;
            }
            self.kinds[index]
                .check(given)
                .map_err(|message| Error::InvalidInstance {
                    record: self.name.clone(),
                    field: Some(field.name.clone()),
                    message,
                })?;
            instance.insert(field.name.clone(), given.clone());
        }

        Ok(instance)
    }

    /// Kind of field `index`
    pub fn kind(&self, index: usize) -> Option<ScalarKind> {
        self.kinds.get(index).copied()
    }

    fn field(&self, index: usize) -> Result<&FieldDescriptor> {
        self.fields.get(index).ok_or_else(|| Error::Descriptor {
            type_name: self.name.clone(),
            message: format!("no field at position {}", index),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl TypeDescriptor for DynamicDescriptor {
    type Instance = DynamicRecord;
    type Value = Value;

    fn type_name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    fn instantiate(&self) -> DynamicRecord {
        self.fields
            .iter()
            .zip(&self.initial)
            .map(|(field, value)| (field.name.clone(), value.clone()))
            .collect()
    }

    fn read(&self, instance: &DynamicRecord, index: usize) -> Result<Option<Value>> {
        let field = self.field(index)?;
        if !field.readable() {
            return Err(Error::InaccessibleField {
                field: field.name.clone(),
                type_name: self.name.clone(),
            });
        }

        Ok(instance
            .get(&field.name)
            .filter(|v| !v.is_null())
            .cloned())
    }

    fn write(&self, instance: &mut DynamicRecord, index: usize, value: Option<Value>) -> Result<()> {
        let field = self.field(index)?;
        if !field.writable() {
            return Err(Error::InaccessibleField {
                field: field.name.clone(),
                type_name: self.name.clone(),
            });
        }

        let kind = self.kinds[index];
        let stored = match value {
            Some(value) => {
                kind.check(&value).map_err(|_| Error::IncompatibleTypes {
                    from: format!("value {}", value),
                    to: kind.to_string(),
                    field: field.name.clone(),
                })?;
                value
            }
            None if field.field_type.is_nullable() => Value::Null,
            None => kind.default_value(),
        };

        instance.insert(field.name.clone(), stored);
        Ok(())
    }
}
