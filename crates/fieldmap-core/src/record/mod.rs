//! Explicit registration of native Rust records
//!
//! A record type opts in by implementing [`Record`] and returning a
//! [`RecordDescriptor`] built once from [`Field`] registrations. The
//! descriptor stores type-erased getters and setters, so the engine can
//! move values between two unrelated structs without runtime reflection.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

pub mod builder;

pub use builder::{Field, RecordDescriptorBuilder};

use crate::descriptor::TypeDescriptor;
use crate::types::FieldDescriptor;
use crate::{Error, Result};
use std::any::Any;
use std::fmt;

/// Effective value of a native field while it moves between records
///
/// Values never leave the mapping thread, so `Rc` fields register as well.
pub type FieldValue = Box<dyn Any>;

/// Setter failure hands the rejected value back
pub(crate) type SetResult = std::result::Result<(), FieldValue>;

pub(crate) type Getter<R> = Box<dyn Fn(&R) -> Option<FieldValue> + Send + Sync>;
pub(crate) type Setter<R> = Box<dyn Fn(&mut R, Option<FieldValue>) -> SetResult + Send + Sync>;

/// A native record type taking part in mappings
///
/// `Default` provides the zero-valued instance every mapping starts from.
pub trait Record: Default + Sized + 'static {
    /// Field registrations for this type
    fn describe() -> Result<RecordDescriptor<Self>>;
}

pub(crate) struct Accessors<R> {
    pub(crate) getter: Option<Getter<R>>,
    pub(crate) setter: Option<Setter<R>>,
}

/// Field table and accessors for the native record type `R`
pub struct RecordDescriptor<R> {
    name: String,
    fields: Vec<FieldDescriptor>,
    accessors: Vec<Accessors<R>>,
    factory: Box<dyn Fn() -> R + Send + Sync>,
}

impl<R: Default + 'static> RecordDescriptor<R> {
    /// Start registering the fields of `R`
    pub fn builder(name: impl Into<String>) -> RecordDescriptorBuilder<R> {
        RecordDescriptorBuilder::new(name)
    }
}

impl<R> RecordDescriptor<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn accessors(&self, index: usize) -> Result<&Accessors<R>> {
        self.accessors.get(index).ok_or_else(|| Error::Descriptor {
            type_name: self.name.clone(),
            message: format!("no field at position {}", index),
        })
    }
}

impl<R> TypeDescriptor for RecordDescriptor<R> {
    type Instance = R;
    type Value = FieldValue;

    fn type_name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    fn instantiate(&self) -> R {
        (self.factory)()
    }

    fn read(&self, instance: &R, index: usize) -> Result<Option<FieldValue>> {
        let getter = self.accessors(index)?.getter.as_ref().ok_or_else(|| {
            Error::InaccessibleField {
                field: self.fields[index].name.clone(),
                type_name: self.name.clone(),
            }
        })?;
        Ok(getter(instance))
    }

    fn write(&self, instance: &mut R, index: usize, value: Option<FieldValue>) -> Result<()> {
        let setter = self.accessors(index)?.setter.as_ref().ok_or_else(|| {
            Error::InaccessibleField {
                field: self.fields[index].name.clone(),
                type_name: self.name.clone(),
            }
        })?;
        // A resolved plan only hands over values of the declared type; a
        // mismatch here means it ran against other descriptors.
        setter(instance, value).map_err(|_| Error::Descriptor {
            type_name: self.name.clone(),
            message: format!(
                "field '{}' received a value that is not {}",
                self.fields[index].name,
                self.fields[index].field_type.effective_name()
            ),
        })
    }
}

impl<R> fmt::Debug for RecordDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
