//! status command - Verbose per-repository report

use anyhow::Result;

use super::resolve_handles;
use crate::cli::Context;
use crate::fleet::{RepositoryHandle, RepositoryReport};
use crate::git::Git2Backend;
use crate::ui::output;

/// Print the verbose status of `paths`, or of every resolved repository.
///
/// `full` is ORed with the configured default.
pub fn status(ctx: &Context, full: bool, paths: &[String]) -> Result<()> {
    let handles = if paths.is_empty() {
        resolve_handles(ctx)?
    } else {
        paths.iter().map(|p| RepositoryHandle::new(p)).collect()
    };
    let full = full || ctx.config.status_full();

    for handle in &handles {
        let report = RepositoryReport::collect(&Git2Backend, handle);
        // The trailing newline leaves a blank line between repositories.
        output::data(report.render_text(full));
    }
    Ok(())
}
