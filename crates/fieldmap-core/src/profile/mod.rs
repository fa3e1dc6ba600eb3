//! Profiles: record types declared in YAML, JSON or TOML
//!
//! A profile lists record types whose instances are JSON objects. Every
//! record becomes a [`DynamicDescriptor`], so profile records go through the
//! same [`crate::MappingPlan`] engine as native ones.
//!
//! ```yaml
//! records:
//!   - name: Customer
//!     fields:
//!       - { name: id, type: int }
//!       - { name: name, type: "string?" }
//!   - name: CustomerView
//!     fields:
//!       - { name: my_id, type: int, from: id }
//! ```
//!
//! Copyright (c) 2025 Fieldmap Team
//! Licensed under the Apache-2.0 license

pub mod dynamic;
pub mod kind;

pub use dynamic::{DynamicDescriptor, DynamicRecord};
pub use kind::ScalarKind;

use crate::types::Access;
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Serialization format of a profile file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    Json,
    Yaml,
    Toml,
}

impl ProfileFormat {
    /// Pick the format from a file extension; anything unrecognized is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => ProfileFormat::Yaml,
            Some("toml") => ProfileFormat::Toml,
            _ => ProfileFormat::Json,
        }
    }
}

/// One field of a profile record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// Scalar kind with an optional trailing `?`
    #[serde(rename = "type")]
    pub type_name: String,
    /// Name of the corresponding field on the other record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default)]
    pub access: Access,
    /// Initial value of the field in a new instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// One record type of a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// A set of record declarations
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub records: Vec<RecordSpec>,
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

impl Profile {
    /// Load and validate a profile file, choosing the format by extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
            message: format!("Failed to read profile {}", path.display()),
            source: e,
        })?;

        debug!(path = %path.display(), "Loading profile");
        Self::parse(&content, ProfileFormat::from_path(path))
    }

    /// Parse and validate profile text
    pub fn parse(content: &str, format: ProfileFormat) -> Result<Self> {
        let profile: Profile = match format {
            ProfileFormat::Json => serde_json::from_str(content)?,
            ProfileFormat::Yaml => serde_yaml::from_str(content)?,
            ProfileFormat::Toml => toml::from_str(content)?,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check names, identifiers, declared types and defaults
    pub fn validate(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(Error::profile("profile declares no records"));
        }

        let mut record_names = HashSet::new();

        for record in &self.records {
            if !identifier_pattern().is_match(&record.name) {
                return Err(Error::profile_at(
                    format!("'{}' is not a valid record name", record.name),
                    &record.name,
                    None,
                ));
            }
            if !record_names.insert(record.name.as_str()) {
                return Err(Error::profile_at("duplicate record name", &record.name, None));
            }

            let mut field_names = HashSet::new();
            for field in &record.fields {
                if !identifier_pattern().is_match(&field.name) {
                    return Err(Error::profile_at(
                        format!("'{}' is not a valid field name", field.name),
                        &record.name,
                        Some(field.name.as_str()),
                    ));
                }
                if !field_names.insert(field.name.as_str()) {
                    return Err(Error::profile_at(
                        "duplicate field name",
                        &record.name,
                        Some(field.name.as_str()),
                    ));
                }
                if let Some(from) = field.from.as_deref().filter(|f| !f.is_empty()) {
                    if !identifier_pattern().is_match(from) {
                        return Err(Error::profile_at(
                            format!("'{}' is not a valid correspondence", from),
                            &record.name,
                            Some(field.name.as_str()),
                        ));
                    }
                }

                let (kind, nullable) = ScalarKind::parse_declared(&field.type_name)
                    .map_err(|msg| Error::profile_at(msg, &record.name, Some(field.name.as_str())))?;

                match &field.default {
                    None => {}
                    Some(serde_json::Value::Null) if nullable => {}
                    Some(value) => kind.check(value).map_err(|msg| {
                        Error::profile_at(
                            format!("invalid default: {}", msg),
                            &record.name,
                            Some(field.name.as_str()),
                        )
                    })?,
                }
            }
        }

        Ok(())
    }

    /// Declaration of the record called `name`
    pub fn record(&self, name: &str) -> Result<&RecordSpec> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| Error::UnknownRecord {
                name: name.to_string(),
            })
    }

    /// Descriptor for the record called `name`
    pub fn descriptor(&self, name: &str) -> Result<DynamicDescriptor> {
        DynamicDescriptor::from_spec(self.record(name)?)
    }

    pub fn record_names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }
}
