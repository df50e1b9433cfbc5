//! list command - Resolved repositories with their state

use anyhow::Result;

use super::resolve_handles;
use crate::cli::Context;
use crate::fleet::classify;
use crate::git::Git2Backend;
use crate::ui::output;

/// Print every resolved repository, one per line.
///
/// With `paths_only` the repositories are not opened at all.
pub fn list(ctx: &Context, paths_only: bool) -> Result<()> {
    let handles = resolve_handles(ctx)?;

    if paths_only {
        for handle in &handles {
            output::data(handle);
        }
        return Ok(());
    }

    let width = handles.iter().map(|h| h.path().len()).max().unwrap_or(0);
    for handle in &handles {
        let flags = classify(&Git2Backend, handle);
        output::data(format!("{:<width$}  {}", handle.path(), flags.marker()));
    }
    Ok(())
}
