//! Field and type metadata consumed by the mapping engine
//!
//! A [`FieldDescriptor`] is the only view of a field the engine ever has:
//! its name, declared [`FieldType`], access flags and the optional name of
//! the corresponding field on the other record type.
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

use crate::profile::ScalarKind;
use serde::{Deserialize, Serialize};
use std::any::{type_name, TypeId};
use std::fmt;

/// Identity of an effective (non-nullable) type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// A Rust type registered through [`crate::RecordDescriptor`]
    Native(TypeId),
    /// A scalar declared in a profile
    Scalar(ScalarKind),
}

/// Declared type of a field
///
/// `nullable` records one layer of optional wrapping around the effective
/// type identified by `key`. For native fields declared with
/// [`crate::Field::optional`] the key is the `T` of `Option<T>`, so
/// `Option<Option<i32>>` keeps `Option<i32>` as its effective type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    key: TypeKey,
    name: String,
    nullable: bool,
}

impl FieldType {
    /// Plain native type `T`
    pub fn of<T: 'static>() -> Self {
        Self {
            key: TypeKey::Native(TypeId::of::<T>()),
            name: short_type_name(type_name::<T>()),
            nullable: false,
        }
    }

    /// Native `Option<T>`
    pub fn optional<T: 'static>() -> Self {
        Self {
            nullable: true,
            ..Self::of::<T>()
        }
    }

    /// Profile scalar
    pub fn scalar(kind: ScalarKind, nullable: bool) -> Self {
        Self {
            key: TypeKey::Scalar(kind),
            name: kind.to_string(),
            nullable,
        }
    }

    /// Identity of the effective type
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Whether the declared type carries a nullable layer
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Name of the effective type
    pub fn effective_name(&self) -> &str {
        &self.name
    }

    /// Whether a value of `source`'s effective type can be stored in a field
    /// of this effective type.
    ///
    /// Distinct concrete types are never related, so this is identity of the
    /// effective types: no numeric widening, no cross-family coercion.
    pub fn is_assignable_from(&self, source: &FieldType) -> bool {
        self.key == source.key
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key {
            TypeKey::Native(_) if self.nullable => write!(f, "Option<{}>", self.name),
            _ if self.nullable => write!(f, "{}?", self.name),
            _ => f.write_str(&self.name),
        }
    }
}

/// Strips module paths from a `std::any::type_name` rendering,
/// `alloc::string::String` becomes `String` and
/// `core::option::Option<alloc::string::String>` becomes `Option<String>`.
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(segment.rsplit("::").next().unwrap_or(segment.as_str()));
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(segment.as_str()));
    out
}

/// Read/write capability of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    ReadWrite,
    ReadOnly,
    WriteOnly,
    None,
}

impl Access {
    pub fn from_flags(readable: bool, writable: bool) -> Self {
        match (readable, writable) {
            (true, true) => Access::ReadWrite,
            (true, false) => Access::ReadOnly,
            (false, true) => Access::WriteOnly,
            (false, false) => Access::None,
        }
    }

    pub fn readable(self) -> bool {
        matches!(self, Access::ReadWrite | Access::ReadOnly)
    }

    pub fn writable(self) -> bool {
        matches!(self, Access::ReadWrite | Access::WriteOnly)
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Access::ReadWrite => "read_write",
            Access::ReadOnly => "read_only",
            Access::WriteOnly => "write_only",
            Access::None => "none",
        };
        f.write_str(s)
    }
}

/// Metadata describing one field of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: FieldType,
    pub access: Access,
    /// Name of the field on the other record type supplying this field
    pub correspondence: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType, access: Access) -> Self {
        Self {
            name: name.into(),
            field_type,
            access,
            correspondence: None,
        }
    }

    pub fn readable(&self) -> bool {
        self.access.readable()
    }

    pub fn writable(&self) -> bool {
        self.access.writable()
    }

    /// Both getter and setter are required for a field to take part in a
    /// mapping, whichever side of the copy it is on.
    pub fn is_accessible(&self) -> bool {
        self.readable() && self.writable()
    }

    /// Declared correspondence, treating an empty name as undeclared
    pub fn correspondence(&self) -> Option<&str> {
        self.correspondence.as_deref().filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_nullable_and_plain_share_effective_type() {
        let plain = FieldType::of::<i32>();
        let nullable = FieldType::optional::<i32>();
        assert!(plain.is_assignable_from(&nullable));
        assert!(nullable.is_assignable_from(&plain));
        assert_eq!(plain.effective_name(), "i32");
        assert_eq!(nullable.to_string(), "Option<i32>");
    }

    #[test]
    fn test_cross_family_not_assignable() {
        let date = FieldType::of::<NaiveDate>();
        let int = FieldType::of::<i32>();
        assert!(!date.is_assignable_from(&int));
        assert!(!FieldType::of::<i64>().is_assignable_from(&int));
    }

    #[test]
    fn test_only_one_nullable_layer_is_stripped() {
        let double = FieldType::optional::<Option<i32>>();
        assert!(!double.is_assignable_from(&FieldType::of::<i32>()));
        assert!(double.is_assignable_from(&FieldType::of::<Option<i32>>()));
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("alloc::string::String"), "String");
        assert_eq!(
            short_type_name("core::option::Option<alloc::string::String>"),
            "Option<String>"
        );
        assert_eq!(
            short_type_name("alloc::sync::Arc<alloc::vec::Vec<u8>>"),
            "Arc<Vec<u8>>"
        );
        assert_eq!(short_type_name("i32"), "i32");
    }

    #[test]
    fn test_scalar_types() {
        let a = FieldType::scalar(ScalarKind::Int, false);
        let b = FieldType::scalar(ScalarKind::Int, true);
        assert!(a.is_assignable_from(&b));
        assert_eq!(b.to_string(), "int?");
        assert!(!a.is_assignable_from(&FieldType::scalar(ScalarKind::Date, false)));
    }

    #[test]
    fn test_access_flags() {
        assert!(Access::ReadWrite.readable() && Access::ReadWrite.writable());
        assert!(!Access::ReadOnly.writable());
        assert!(!Access::WriteOnly.readable());
        assert_eq!(Access::from_flags(false, false), Access::None);

        let mut field = FieldDescriptor::new("id", FieldType::of::<i32>(), Access::ReadOnly);
        assert!(!field.is_accessible());
        field.correspondence = Some(String::new());
        assert_eq!(field.correspondence(), None);
    }
}
