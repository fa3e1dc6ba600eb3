//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - The `FIELDMAP_CONFIG` environment variable or `--config`

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Profile used when a command is given none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<PathBuf>,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Path settings
    pub paths: PathConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,

    /// Smallest batch that gets a progress bar
    pub progress_threshold: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: String,

    /// Log file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Include timestamps
    pub timestamps: bool,

    /// Include thread IDs
    pub thread_ids: bool,
}

/// Path configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Directory searched for relative profile paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
            progress: true,
            progress_threshold: 100,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
            file: None,
            timestamps: true,
            thread_ids: false,
        }
    }
}

/// File format of a configuration file, by extension
fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|s| s.to_str()), Some("yaml") | Some("yml"))
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            // Current directory
            PathBuf::from(".fieldmap.toml"),
            PathBuf::from(".fieldmap.yaml"),
            PathBuf::from(".fieldmap.json"),
        ];

        // User config directory
        if let Some(user_path) = Self::user_config_path() {
            let dir = user_path.parent().map(Path::to_path_buf);
            paths.push(user_path);
            if let Some(dir) = dir {
                paths.push(dir.join("config.yaml"));
                paths.push(dir.join("config.json"));
            }
        }

        // Home directory
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".fieldmap.toml"));
            paths.push(home_dir.join(".fieldmap.yaml"));
        }

        paths
    }

    /// Location of the user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("fieldmap").join("config.toml"))
    }

    /// Resolve the profile a command should load.
    ///
    /// An explicit path wins; a relative path that does not exist is looked
    /// up in `paths.profiles_dir`. Without a path the configured default
    /// profile is used.
    pub fn resolve_profile(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        let requested = match explicit {
            Some(path) => path.to_path_buf(),
            None => self.default_profile.clone().ok_or_else(|| {
                Error::invalid_args("no profile given and no default_profile configured")
            })?,
        };

        if requested.exists() {
            return Ok(requested);
        }

        if requested.is_relative() {
            if let Some(dir) = &self.paths.profiles_dir {
                let candidate = dir.join(&requested);
                if candidate.exists() {
                    return Ok(candidate);
                }
            }
        }

        Err(Error::FileNotFound { path: requested })
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else if is_toml(path) {
            toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.format, OutputFormat::Human);
        assert_eq!(config.output.progress_threshold, 100);
        assert_eq!(config.logging.format, "compact");
        assert!(config.default_profile.is_none());
    }

    #[test]
    fn test_save_and_load_each_format() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.default_profile = Some(PathBuf::from("records.yaml"));
        config.output.format = OutputFormat::JsonPretty;

        for name in ["config.toml", "config.yaml", "config.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            let loaded = Config::from_file(&path).unwrap();
            assert_eq!(loaded.default_profile, config.default_profile);
            assert_eq!(loaded.output.format, OutputFormat::JsonPretty);
        }
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "output:\n  format: yaml\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Yaml);
        assert!(config.output.color);
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::from_file(Path::new("/nonexistent/fieldmap.toml")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_resolve_profile() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("records.yaml"), "records: []\n").unwrap();

        let mut config = Config::default();
        assert!(matches!(
            config.resolve_profile(None),
            Err(Error::InvalidArgs(_))
        ));

        config.paths.profiles_dir = Some(dir.path().to_path_buf());
        let resolved = config
            .resolve_profile(Some(Path::new("records.yaml")))
            .unwrap();
        assert_eq!(resolved, dir.path().join("records.yaml"));

        config.default_profile = Some(PathBuf::from("records.yaml"));
        assert_eq!(config.resolve_profile(None).unwrap(), dir.path().join("records.yaml"));

        assert!(matches!(
            config.resolve_profile(Some(Path::new("absent.yaml"))),
            Err(Error::FileNotFound { .. })
        ));
    }
}
