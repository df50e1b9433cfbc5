//! config command - Show or create the configuration file

use anyhow::{bail, Context as _, Result};

use crate::cli::Context;
use crate::core::config::{Config, CsvDefaults, GlobalConfig, StatusDefaults, DEFAULT_CSV_FILE};
use crate::ui::output;

/// Print the effective configuration.
pub fn show(ctx: &Context) -> Result<()> {
    match &ctx.config_source {
        Some(path) => output::print(format!("# from {}", path.display()), ctx.verbosity),
        None => output::print("# no config file found, using defaults", ctx.verbosity),
    }

    let effective = GlobalConfig {
        locations_file: Some(ctx.locations_file.clone()),
        status: Some(StatusDefaults {
            full: Some(ctx.config.status_full()),
        }),
        csv: Some(CsvDefaults {
            output: Some(ctx.config.csv_output()),
        }),
    };
    let text = toml::to_string_pretty(&effective).context("Failed to serialize config")?;
    output::data(text.trim_end());
    Ok(())
}

/// Write a default config file at the canonical location.
pub fn init(ctx: &Context, force: bool) -> Result<()> {
    let path = Config::global_config_path().context("Cannot determine config path")?;
    if path.exists() && !force {
        bail!(
            "Config file '{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }

    let defaults = GlobalConfig {
        locations_file: Some(ctx.locations_file.clone()),
        status: Some(StatusDefaults { full: Some(false) }),
        csv: Some(CsvDefaults {
            output: Some(DEFAULT_CSV_FILE.into()),
        }),
    };
    Config::write_global(&path, &defaults).context("Failed to write config")?;

    output::print(format!("Wrote {}", path.display()), ctx.verbosity);
    Ok(())
}
