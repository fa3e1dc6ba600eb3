//! Builder for explicit record registration
//!
//! Each [`Field`] pairs a field's metadata with type-erased accessors and,
//! optionally, the correspondence declared with [`Field::from`]:
//!
//! ```
//! use fieldmap_core::{Field, RecordDescriptor};
//!
//! #[derive(Default)]
//! struct CustomerView {
//!     my_id: i32,
//!     my_name: Option<String>,
//!     my_age: i32,
//! }
//!
//! let descriptor = RecordDescriptor::<CustomerView>::builder("CustomerView")
//!     .field(Field::new("my_id", |v: &CustomerView| &v.my_id, |v, x| v.my_id = x).from("id"))
//!     .field(Field::optional("my_name", |v: &CustomerView| &v.my_name, |v, x| v.my_name = x).from("name"))
//!     .field(Field::new("my_age", |v: &CustomerView| &v.my_age, |v, x| v.my_age = x))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(descriptor.len(), 3);
//! ```
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use super::{Accessors, FieldValue, Getter, RecordDescriptor, SetResult, Setter};
use crate::types::{Access, FieldDescriptor, FieldType};
use crate::{Error, Result};
use std::collections::HashSet;

/// One field registration: metadata, accessors and correspondence
pub struct Field<R> {
    name: String,
    field_type: FieldType,
    getter: Option<Getter<R>>,
    setter: Option<Setter<R>>,
    from: Option<String>,
    // plain constructor given an Option<T>; rejected at build()
    wraps_option: bool,
}

impl<R: 'static> Field<R> {
    /// Plain field of type `T` with getter and setter
    ///
    /// An absent value written into this field stores `T::default()`.
    /// `Option<T>` fields must be registered with [`Field::optional`];
    /// [`RecordDescriptorBuilder::build`] rejects them here.
    pub fn new<T, G, S>(name: impl Into<String>, get: G, set: S) -> Self
    where
        T: Clone + Default + 'static,
        G: Fn(&R) -> &T + Send + Sync + 'static,
        S: Fn(&mut R, T) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            field_type: FieldType::of::<T>(),
            getter: Some(plain_getter(get)),
            setter: Some(plain_setter(set)),
            from: None,
            wraps_option: is_option::<T>(),
        }
    }

    /// Nullable field of type `Option<T>` with getter and setter
    pub fn optional<T, G, S>(name: impl Into<String>, get: G, set: S) -> Self
    where
        T: Clone + 'static,
        G: Fn(&R) -> &Option<T> + Send + Sync + 'static,
        S: Fn(&mut R, Option<T>) + Send + Sync + 'static,
    {
        let getter: Getter<R> = Box::new(move |record: &R| {
            get(record).clone().map(|v| Box::new(v) as FieldValue)
        });
        let setter: Setter<R> = Box::new(move |record: &mut R, value: Option<FieldValue>| -> SetResult {
            let value = match value {
                Some(boxed) => Some(*boxed.downcast::<T>()?),
                None => None,
            };
            set(record, value);
            Ok(())
        });

        Self {
            name: name.into(),
            field_type: FieldType::optional::<T>(),
            getter: Some(getter),
            setter: Some(setter),
            from: None,
            wraps_option: false,
        }
    }

    /// Plain field exposing only a getter
    pub fn read_only<T, G>(name: impl Into<String>, get: G) -> Self
    where
        T: Clone + 'static,
        G: Fn(&R) -> &T + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            field_type: FieldType::of::<T>(),
            getter: Some(plain_getter(get)),
            setter: None,
            from: None,
            wraps_option: is_option::<T>(),
        }
    }

    /// Plain field exposing only a setter
    pub fn write_only<T, S>(name: impl Into<String>, set: S) -> Self
    where
        T: Default + 'static,
        S: Fn(&mut R, T) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            field_type: FieldType::of::<T>(),
            getter: None,
            setter: Some(plain_setter(set)),
            from: None,
            wraps_option: is_option::<T>(),
        }
    }

    /// Declare the name of the field on the other record supplying this one.
    /// Declaring again replaces the previous name.
    pub fn from(mut self, source_name: impl Into<String>) -> Self {
        self.from = Some(source_name.into());
        self
    }

    fn descriptor(&self) -> FieldDescriptor {
        let access = Access::from_flags(self.getter.is_some(), self.setter.is_some());
        let mut descriptor = FieldDescriptor::new(self.name.clone(), self.field_type.clone(), access);
        descriptor.correspondence = self.from.clone();
        descriptor
    }
}

fn is_option<T: 'static>() -> bool {
    std::any::type_name::<T>().starts_with("core::option::Option<")
}

fn plain_getter<R, T, G>(get: G) -> Getter<R>
where
    T: Clone + 'static,
    G: Fn(&R) -> &T + Send + Sync + 'static,
{
    Box::new(move |record: &R| Some(Box::new(get(record).clone()) as FieldValue))
}

fn plain_setter<R, T, S>(set: S) -> Setter<R>
where
    T: Default + 'static,
    S: Fn(&mut R, T) + Send + Sync + 'static,
{
    Box::new(move |record: &mut R, value: Option<FieldValue>| -> SetResult {
        let value = match value {
            Some(boxed) => *boxed.downcast::<T>()?,
            None => T::default(),
        };
        set(record, value);
        Ok(())
    })
}

/// Builder for [`RecordDescriptor`]
pub struct RecordDescriptorBuilder<R> {
    name: String,
    fields: Vec<Field<R>>,
    factory: Box<dyn Fn() -> R + Send + Sync>,
}

impl<R: Default + 'static> RecordDescriptorBuilder<R> {
    /// Create a new builder; instances default to `R::default()`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            factory: Box::new(R::default),
        }
    }
}

impl<R: 'static> RecordDescriptorBuilder<R> {
    /// Append a field; declaration order is enumeration order
    pub fn field(mut self, field: Field<R>) -> Self {
        self.fields.push(field);
        self
    }

    /// Replace the default-instance factory
    pub fn factory(mut self, factory: impl Fn() -> R + Send + Sync + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    /// Build the descriptor
    pub fn build(self) -> Result<RecordDescriptor<R>> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(Error::Descriptor {
                    type_name: self.name.clone(),
                    message: "field name must not be empty".to_string(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::Descriptor {
                    type_name: self.name.clone(),
                    message: format!("field '{}' registered twice", field.name),
                });
            }
            if field.wraps_option {
                return Err(Error::Descriptor {
                    type_name: self.name.clone(),
                    message: format!(
                        "field '{}' has an Option type; register it with Field::optional",
                        field.name
                    ),
                });
            }
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        let mut accessors = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            fields.push(field.descriptor());
            accessors.push(Accessors {
                getter: field.getter,
                setter: field.setter,
            });
        }

        Ok(RecordDescriptor {
            name: self.name,
            fields,
            accessors,
            factory: self.factory,
        })
    }
}
