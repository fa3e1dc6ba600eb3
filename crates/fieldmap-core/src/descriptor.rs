//! The record description the engine operates on
//!
//! Anything able to enumerate its fields, build a default instance and read
//! or write one field by position can take part in a mapping. Explicit
//! registration ([`crate::RecordDescriptor`]) and profiles
//! ([`crate::DynamicDescriptor`]) are the two implementations shipped here.

use crate::types::FieldDescriptor;
use crate::Result;

/// Description of a record type plus the capabilities the engine needs
pub trait TypeDescriptor {
    /// Live value of the described record type
    type Instance;

    /// Effective value moved from one field to another. `None` stands for an
    /// absent value of a nullable field.
    type Value;

    /// Name used in error messages
    fn type_name(&self) -> &str;

    /// Fields in declaration order
    fn fields(&self) -> &[FieldDescriptor];

    /// Position of the field called `name`
    fn index_of(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.name == name)
    }

    /// Build a new default-initialized instance
    fn instantiate(&self) -> Self::Instance;

    /// Read the effective value of field `index`
    fn read(&self, instance: &Self::Instance, index: usize) -> Result<Option<Self::Value>>;

    /// Store an effective value into field `index`. An absent value written
    /// into a non-nullable field stores that field's default.
    fn write(
        &self,
        instance: &mut Self::Instance,
        index: usize,
        value: Option<Self::Value>,
    ) -> Result<()>;
}
