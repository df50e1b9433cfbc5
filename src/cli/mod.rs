//! cli
//!
//! Command-line interface layer for gitfleet.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and initialise logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers resolve the location set, hand the
//! handles to [`crate::fleet`] with the production [`Git2Backend`] and
//! format what comes back. Repositories are never modified.
//!
//! [`Git2Backend`]: crate::git::Git2Backend

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::core::locations::LocationStore;
use crate::telemetry;
use crate::ui::output::Verbosity;

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    /// Where the configuration was read from, if anywhere.
    pub config_source: Option<PathBuf>,
    /// Location set file, after `--locations` is applied.
    pub locations_file: PathBuf,
    pub verbosity: Verbosity,
}

impl Context {
    pub fn location_store(&self) -> LocationStore {
        LocationStore::new(&self.locations_file)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    telemetry::init_tracing(cli.log_json, telemetry::default_level(cli.debug));

    let (config, config_source) = match &cli.config {
        Some(path) => (
            Config::load_from(path)
                .with_context(|| format!("Failed to load config '{}'", path.display()))?,
            Some(path.clone()),
        ),
        None => {
            let loaded = Config::load().context("Failed to load config")?;
            (loaded.config, loaded.source)
        }
    };

    // CLI flag always takes precedence over the config file.
    let locations_file = match &cli.locations {
        Some(path) => path.clone(),
        None => config
            .locations_file()
            .context("Cannot determine the location set file")?,
    };

    let ctx = Context {
        config,
        config_source,
        locations_file,
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
    };

    commands::dispatch(cli.command, &ctx)
}
