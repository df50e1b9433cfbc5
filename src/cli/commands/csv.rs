//! csv command - Write the CSV report

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::resolve_handles;
use crate::cli::Context;
use crate::fleet::{collect_all, write_csv};
use crate::git::Git2Backend;
use crate::ui::output;

/// Write one CSV row per resolved repository to `output` (or the
/// configured default). `-` writes to stdout.
pub fn csv(ctx: &Context, output: Option<PathBuf>) -> Result<()> {
    let target = output.unwrap_or_else(|| ctx.config.csv_output());
    let handles = resolve_handles(ctx)?;
    let reports = collect_all(&Git2Backend, &handles);

    if target == Path::new("-") {
        write_csv(io::stdout().lock(), &reports).context("Failed to write CSV to stdout")?;
        return Ok(());
    }

    let file = File::create(&target)
        .with_context(|| format!("Failed to create '{}'", target.display()))?;
    write_csv(BufWriter::new(file), &reports)
        .with_context(|| format!("Failed to write '{}'", target.display()))?;

    output::print(
        format!("Wrote {} repositories to {}", reports.len(), target.display()),
        ctx.verbosity,
    );
    Ok(())
}
