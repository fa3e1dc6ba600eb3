//! Error types for the fieldmap core library
//!
//! The three mapping errors (`InaccessibleField`, `UnknownSourceField` and
//! `IncompatibleTypes`) are schema errors: they are raised the first time a
//! declared correspondence fails a check and must be fixed in the record
//! declarations, never retried. The remaining variants cover descriptor
//! registration, profile loading and instance parsing.

use std::fmt;
use thiserror::Error;

/// Main error type for fieldmap operations
#[derive(Error, Debug)]
pub enum Error {
    /// A participating field lacks read or write capability
    #[error("Missing get or set access on field '{field}' of '{type_name}'")]
    InaccessibleField {
        field: String,
        type_name: String,
    },

    /// A declared correspondence names a field the other record does not have
    #[error("Missing field '{name}' on '{expected_on_type}'")]
    UnknownSourceField {
        name: String,
        expected_on_type: String,
    },

    /// Effective types of the two fields are not assignable
    #[error("Cannot assign {from} to {to} (field '{field}')")]
    IncompatibleTypes {
        from: String,
        to: String,
        field: String,
    },

    /// Invalid explicit registration
    #[error("Invalid descriptor for '{type_name}': {message}")]
    Descriptor {
        type_name: String,
        message: String,
    },

    /// Profile declaration errors
    #[error("Profile error: {message}{}", location(.record, .field))]
    Profile {
        message: String,
        record: Option<String>,
        field: Option<String>,
    },

    /// Record name not declared in the profile
    #[error("Unknown record '{name}'")]
    UnknownRecord { name: String },

    /// Instance data does not match its record declaration
    #[error("Invalid instance of '{record}': {message}{}", field_suffix(.field))]
    InvalidInstance {
        record: String,
        field: Option<String>,
        message: String,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

fn location(record: &Option<String>, field: &Option<String>) -> String {
    match (record, field) {
        (Some(r), Some(f)) => format!(" (at {}.{})", r, f),
        (Some(r), None) => format!(" (at {})", r),
        (None, Some(f)) => format!(" (at field {})", f),
        (None, None) => String::new(),
    }
}

fn field_suffix(field: &Option<String>) -> String {
    field
        .as_ref()
        .map(|f| format!(" (field '{}')", f))
        .unwrap_or_default()
}

impl Error {
    /// Create a profile error without location
    pub fn profile(message: impl Into<String>) -> Self {
        Self::Profile {
            message: message.into(),
            record: None,
            field: None,
        }
    }

    /// Create a profile error attached to a record, and optionally a field
    pub fn profile_at(
        message: impl Into<String>,
        record: impl Into<String>,
        field: Option<&str>,
    ) -> Self {
        Self::Profile {
            message: message.into(),
            record: Some(record.into()),
            field: field.map(str::to_string),
        }
    }

    /// Stable machine-readable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InaccessibleField { .. } => ErrorCode::InaccessibleField,
            Self::UnknownSourceField { .. } => ErrorCode::UnknownSourceField,
            Self::IncompatibleTypes { .. } => ErrorCode::IncompatibleTypes,
            Self::Descriptor { .. } => ErrorCode::Descriptor,
            Self::Profile { .. } | Self::UnknownRecord { .. } => ErrorCode::Profile,
            Self::InvalidInstance { .. } => ErrorCode::InvalidInstance,
            Self::Json { .. } | Self::Yaml(_) | Self::Toml(_) => ErrorCode::Format,
            Self::Io { .. } => ErrorCode::Io,
        }
    }

    /// True for the three errors raised by the mapping engine itself
    pub fn is_mapping_error(&self) -> bool {
        matches!(
            self,
            Self::InaccessibleField { .. }
                | Self::UnknownSourceField { .. }
                | Self::IncompatibleTypes { .. }
        )
    }
}

/// Error codes exposed to tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InaccessibleField,
    UnknownSourceField,
    IncompatibleTypes,
    Descriptor,
    Profile,
    InvalidInstance,
    Format,
    Io,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ErrorCode::InaccessibleField => "INACCESSIBLE_FIELD",
            ErrorCode::UnknownSourceField => "UNKNOWN_SOURCE_FIELD",
            ErrorCode::IncompatibleTypes => "INCOMPATIBLE_TYPES",
            ErrorCode::Descriptor => "DESCRIPTOR",
            ErrorCode::Profile => "PROFILE",
            ErrorCode::InvalidInstance => "INVALID_INSTANCE",
            ErrorCode::Format => "FORMAT",
            ErrorCode::Io => "IO",
        };
        f.write_str(code)
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}
