//! Scalar kinds available to profile records

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Scalar type of a profile field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Bool,
    Byte,
    Int,
    Long,
    Double,
    String,
    /// Calendar date, `YYYY-MM-DD`
    Date,
    /// RFC 3339 timestamp
    DateTime,
    Uuid,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 9] = [
        ScalarKind::Bool,
        ScalarKind::Byte,
        ScalarKind::Int,
        ScalarKind::Long,
        ScalarKind::Double,
        ScalarKind::String,
        ScalarKind::Date,
        ScalarKind::DateTime,
        ScalarKind::Uuid,
    ];

    /// Parse a declared type such as `int` or `string?` into its kind and
    /// nullability
    pub fn parse_declared(declared: &str) -> Result<(ScalarKind, bool), String> {
        let declared = declared.trim();
        let (base, nullable) = match declared.strip_suffix('?') {
            Some(base) => (base.trim_end(), true),
            None => (declared, false),
        };
        if base.ends_with('?') {
            return Err(format!("'{}' declares more than one nullable layer", declared));
        }
        Ok((base.parse()?, nullable))
    }

    /// Zero value stored when a non-nullable field receives no value
    pub fn default_value(self) -> Value {
        match self {
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::Byte | ScalarKind::Int | ScalarKind::Long => Value::from(0),
            ScalarKind::Double => Value::from(0.0),
            ScalarKind::String => Value::String(String::new()),
            ScalarKind::Date => Value::String("0001-01-01".to_string()),
            ScalarKind::DateTime => Value::String("0001-01-01T00:00:00Z".to_string()),
            ScalarKind::Uuid => Value::String(Uuid::nil().to_string()),
        }
    }

    /// Check that a JSON value is a valid, non-null value of this kind
    pub fn check(self, value: &Value) -> Result<(), String> {
        let ok = match self {
            ScalarKind::Bool => value.is_boolean(),
            ScalarKind::Byte => value.as_u64().is_some_and(|n| n <= u8::MAX as u64),
            ScalarKind::Int => value
                .as_i64()
                .is_some_and(|n| i32::try_from(n).is_ok()),
            ScalarKind::Long => value.is_i64() || value.as_u64().is_some_and(|n| n <= i64::MAX as u64),
            ScalarKind::Double => value.is_number(),
            ScalarKind::String => value.is_string(),
            ScalarKind::Date => value
                .as_str()
                .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
            ScalarKind::DateTime => value
                .as_str()
                .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok()),
            ScalarKind::Uuid => value.as_str().is_some_and(|s| Uuid::parse_str(s).is_ok()),
        };

        if ok {
            Ok(())
        } else {
            Err(format!("expected {}, found {}", self, value))
        }
    }
}

impl FromStr for ScalarKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Ok(ScalarKind::Bool),
            "byte" | "u8" => Ok(ScalarKind::Byte),
            "int" | "i32" => Ok(ScalarKind::Int),
            "long" | "i64" => Ok(ScalarKind::Long),
            "double" | "f64" => Ok(ScalarKind::Double),
            "string" => Ok(ScalarKind::String),
            "date" => Ok(ScalarKind::Date),
            "datetime" => Ok(ScalarKind::DateTime),
            "uuid" => Ok(ScalarKind::Uuid),
            other => Err(format!("unknown type '{}'", other)),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Byte => "byte",
            ScalarKind::Int => "int",
            ScalarKind::Long => "long",
            ScalarKind::Double => "double",
            ScalarKind::String => "string",
            ScalarKind::Date => "date",
            ScalarKind::DateTime => "datetime",
            ScalarKind::Uuid => "uuid",
        };
        f.write_str(name)
    }
}
