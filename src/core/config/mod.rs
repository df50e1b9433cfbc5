//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$GITFLEET_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitfleet/config.toml`
//! 3. `~/.gitfleet/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use gitfleet::core::config::Config;
//!
//! let result = Config::load().unwrap();
//! let locations = result.config.locations_file().unwrap();
//! println!("Locations: {}", locations.display());
//! ```

pub mod schema;

pub use schema::{CsvDefaults, GlobalConfig, StatusDefaults};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Path the configuration came from, if any file was found.
    pub source: Option<PathBuf>,
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub global: GlobalConfig,
}

/// Default CSV output file name.
pub const DEFAULT_CSV_FILE: &str = "Repository Summary.csv";

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load() -> Result<ConfigLoadResult, ConfigError> {
        let Some(path) = Self::find_global()? else {
            return Ok(ConfigLoadResult {
                config: Config::default(),
                source: None,
            });
        };
        let config = Self::load_from(&path)?;
        Ok(ConfigLoadResult {
            config,
            source: Some(path),
        })
    }

    /// Load and validate configuration from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let global: GlobalConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        global.validate()?;

        Ok(Config { global })
    }

    fn find_global() -> Result<Option<PathBuf>, ConfigError> {
        if let Ok(path) = std::env::var("GITFLEET_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("gitfleet/config.toml");
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".gitfleet/config.toml");
            if path.exists() {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    /// Canonical path for the global config (`~/.gitfleet/config.toml`).
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".gitfleet/config.toml"))
    }

    /// Write the global config atomically to `path`.
    ///
    /// Creates parent directories if needed. Writes to a temp file and
    /// renames it into place.
    pub fn write_global(path: &Path, config: &GlobalConfig) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(contents.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    // =========================================================================
    // Accessors with defaults
    // =========================================================================

    /// Path of the JSON location set.
    ///
    /// Defaults to `~/.gitfleet/locations.json`.
    pub fn locations_file(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.global.locations_file {
            return Ok(path.clone());
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".gitfleet/locations.json"))
    }

    /// Whether `status` shows every category by default.
    ///
    /// Defaults to `false`.
    pub fn status_full(&self) -> bool {
        self.global
            .status
            .as_ref()
            .and_then(|s| s.full)
            .unwrap_or(false)
    }

    /// Default CSV output path.
    ///
    /// Defaults to [`DEFAULT_CSV_FILE`] in the current directory.
    pub fn csv_output(&self) -> PathBuf {
        self.global
            .csv
            .as_ref()
            .and_then(|c| c.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_FILE))
    }
}
