//! locations command - Show or edit the location set

use anyhow::{Context as _, Result};

use super::load_locations;
use crate::cli::Context;
use crate::core::locations::{normalize_path, LocationKind, RepositoryLocationSet};
use crate::ui::output;

/// Print the location set.
pub fn show(ctx: &Context, json: bool) -> Result<()> {
    let locations = load_locations(ctx)?;

    if json {
        let text =
            serde_json::to_string_pretty(&locations).context("Failed to serialize location set")?;
        output::data(text);
        return Ok(());
    }

    output::print(
        format!("Location set: {}", ctx.locations_file.display()),
        ctx.verbosity,
    );
    for (title, kind) in [
        ("Parent directories", LocationKind::Parent),
        ("Individual repositories", LocationKind::Individual),
        ("Excluded repositories", LocationKind::Exclude),
    ] {
        let paths = locations.list(kind);
        output::data(title);
        if paths.is_empty() {
            output::data("  (none)");
        } else {
            output::data(output::format_list(paths, "  "));
        }
    }
    Ok(())
}

/// Add `path` to one list and save.
pub fn add(ctx: &Context, kind: LocationKind, path: &str) -> Result<()> {
    let mut locations = load_locations(ctx)?;
    let normalized = normalize_path(path);

    if !locations.add(kind, path) {
        output::print(format!("{normalized} is already listed"), ctx.verbosity);
        return Ok(());
    }
    if kind == LocationKind::Individual && locations.is_excluded(&normalized) {
        output::warn(
            format!("{normalized} is also excluded and will not be reported"),
            ctx.verbosity,
        );
    }

    save(ctx, &locations)?;
    output::print(format!("Added {normalized}"), ctx.verbosity);
    Ok(())
}

/// Remove `path` from every list and save.
pub fn remove(ctx: &Context, path: &str) -> Result<()> {
    let mut locations = load_locations(ctx)?;
    let normalized = normalize_path(path);

    if !locations.remove(path) {
        output::print(format!("{normalized} is not listed"), ctx.verbosity);
        return Ok(());
    }

    save(ctx, &locations)?;
    output::print(format!("Removed {normalized}"), ctx.verbosity);
    Ok(())
}

fn save(ctx: &Context, locations: &RepositoryLocationSet) -> Result<()> {
    let store = ctx.location_store();
    store
        .save(locations)
        .with_context(|| format!("Failed to save location set '{}'", store.path().display()))
}
