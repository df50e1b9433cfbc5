//! summary command - Fleet-wide counters

use anyhow::{Context as _, Result};
use chrono::Local;

use super::resolve_handles;
use crate::cli::Context;
use crate::fleet::{classify_all, FleetDetails};
use crate::git::Git2Backend;
use crate::ui::output;

/// Classify every repository and print the counters.
pub fn summary(ctx: &Context, details: bool, json: bool) -> Result<()> {
    let handles = resolve_handles(ctx)?;
    let classified = classify_all(&Git2Backend, &handles);
    let fleet = FleetDetails::from_classified(&classified);

    if json {
        let value = if details {
            serde_json::to_string_pretty(&fleet)
        } else {
            serde_json::to_string_pretty(&fleet.counts)
        }
        .context("Failed to serialize summary")?;
        output::data(value);
        return Ok(());
    }

    output::print(
        format!("Refreshed at {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        ctx.verbosity,
    );
    if details {
        output::data(&fleet);
    } else {
        output::data(fleet.counts);
    }
    Ok(())
}
