//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! locations_file = "/home/me/.gitfleet/locations.json"
//!
//! [status]
//! full = false
//!
//! [csv]
//! output = "Repository Summary.csv"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Path of the JSON location set
    pub locations_file: Option<PathBuf>,

    /// Verbose status defaults
    pub status: Option<StatusDefaults>,

    /// CSV report defaults
    pub csv: Option<CsvDefaults>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.locations_file {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "locations_file cannot be empty".into(),
                ));
            }
        }
        if let Some(csv) = &self.csv {
            csv.validate()?;
        }
        Ok(())
    }
}

/// Defaults for `gitfleet status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StatusDefaults {
    /// Show every change category even for clean repositories
    pub full: Option<bool>,
}

/// Defaults for `gitfleet csv`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CsvDefaults {
    /// Output file (`-` for stdout)
    pub output: Option<PathBuf>,
}

impl CsvDefaults {
    fn validate(&self) -> Result<(), ConfigError> {
        match &self.output {
            Some(p) if p.as_os_str().is_empty() => Err(ConfigError::InvalidValue(
                "csv.output cannot be empty".into(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_parses_to_default() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn full_config_parses() {
        let config: GlobalConfig = toml::from_str(
            r#"
            locations_file = "/tmp/loc.json"

            [status]
            full = true

            [csv]
            output = "out.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.locations_file, Some(PathBuf::from("/tmp/loc.json")));
        assert_eq!(config.status.unwrap().full, Some(true));
        assert_eq!(config.csv.unwrap().output, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<GlobalConfig, _> = toml::from_str("trunk = \"main\"");
        assert!(result.is_err());
    }

    #[test]
    fn empty_paths_invalid() {
        let config = GlobalConfig {
            locations_file: Some(PathBuf::new()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GlobalConfig {
            csv: Some(CsvDefaults {
                output: Some(PathBuf::new()),
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
