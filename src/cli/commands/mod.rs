//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads the location set and resolves it to repository handles
//! 2. Calls into [`crate::fleet`] with the production backend
//! 3. Formats and displays output
//!
//! Handlers never modify repositories; only `locations` and `config`
//! write files, and only gitfleet's own.

mod completion;
mod config_cmd;
mod csv;
mod list;
mod locations;
mod status;
mod summary;

pub use completion::completion;
pub use config_cmd::{init as config_init, show as config_show};
pub use csv::csv;
pub use list::list;
pub use locations::{add as locations_add, remove as locations_remove, show as locations_show};
pub use status::status;
pub use summary::summary;

use anyhow::{Context as _, Result};

use super::args::{Command, ConfigAction, LocationsAction};
use super::Context;
use crate::core::locations::{LocationKind, RepositoryLocationSet};
use crate::fleet::{self, RepositoryHandle};
use crate::ui::output;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Summary { details, json } => summary::summary(ctx, details, json),
        Command::List { paths } => list::list(ctx, paths),
        Command::Status { full, paths } => status::status(ctx, full, &paths),
        Command::Csv { output } => csv::csv(ctx, output),
        Command::Locations { action } => match action {
            LocationsAction::Show { json } => locations::show(ctx, json),
            LocationsAction::AddParent { path } => {
                locations::add(ctx, LocationKind::Parent, &path)
            }
            LocationsAction::AddRepo { path } => {
                locations::add(ctx, LocationKind::Individual, &path)
            }
            LocationsAction::Exclude { path } => locations::add(ctx, LocationKind::Exclude, &path),
            LocationsAction::Remove { path } => locations::remove(ctx, &path),
        },
        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
            ConfigAction::Init { force } => config_cmd::init(ctx, force),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Load the location set named by the context.
pub(crate) fn load_locations(ctx: &Context) -> Result<RepositoryLocationSet> {
    let store = ctx.location_store();
    store
        .load()
        .with_context(|| format!("Failed to load location set '{}'", store.path().display()))
}

/// Load and resolve the location set, hinting when it is empty.
pub(crate) fn resolve_handles(ctx: &Context) -> Result<Vec<RepositoryHandle>> {
    let locations = load_locations(ctx)?;
    if locations.is_empty() {
        output::warn(
            format!(
                "location set '{}' is empty; add one with 'gitfleet locations add-parent <DIR>'",
                ctx.locations_file.display()
            ),
            ctx.verbosity,
        );
    }
    let handles = fleet::resolve(&locations);
    output::debug(
        format!("resolved {} repositories", handles.len()),
        ctx.verbosity,
    );
    Ok(handles)
}
