//! fleet::locator
//!
//! Turns a [`RepositoryLocationSet`] into concrete repository handles.
//!
//! # Rules
//!
//! - A parent directory contributes each immediate subdirectory that
//!   directly contains a `.git` entry (file or directory). Discovery is
//!   exactly one level deep.
//! - Individual repositories are included verbatim; whether they exist is
//!   left to the backend when the handle is opened.
//! - Exclusions are applied last, by exact normalized-path equality.
//! - The result is deduplicated and sorted lexicographically by path.
//! - An unreadable or missing parent directory contributes nothing.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::core::locations::{normalize_path, RepositoryLocationSet};
use crate::git::{Backend, GitError};

/// A repository path produced by one resolution pass.
///
/// Holds no backend state; the repository is opened on demand and the
/// connection dropped by the caller when it is done with it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepositoryHandle {
    path: String,
}

impl RepositoryHandle {
    /// Create a handle for `path`, normalized to forward slashes.
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize_path(path),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Open the backend connection for this repository.
    ///
    /// # Errors
    ///
    /// Propagates the backend's error, [`GitError::NotARepo`] included.
    pub fn open<B: Backend>(&self, backend: &B) -> Result<B::Repo, GitError> {
        backend.open(Path::new(&self.path))
    }
}

impl std::fmt::Display for RepositoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

/// Resolve a location set into an ordered, deduplicated list of handles.
pub fn resolve(locations: &RepositoryLocationSet) -> Vec<RepositoryHandle> {
    let mut paths = BTreeSet::new();

    for parent in &locations.parent_directories {
        paths.extend(scan_parent(&normalize_path(parent)));
    }
    paths.extend(
        locations
            .individual_repositories
            .iter()
            .map(|p| normalize_path(p))
            .filter(|p| !p.is_empty()),
    );

    let excluded: BTreeSet<String> = locations
        .exclude_repositories
        .iter()
        .map(|p| normalize_path(p))
        .collect();

    paths
        .into_iter()
        .filter(|p| {
            let keep = !excluded.contains(p);
            if !keep {
                debug!(path = %p, "excluded");
            }
            keep
        })
        .map(|path| RepositoryHandle { path })
        .collect()
}

/// Immediate subdirectories of `parent` that hold a `.git` entry.
fn scan_parent(parent: &str) -> Vec<String> {
    let entries = match fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(parent, error = %e, "skipping unreadable parent directory");
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    for entry in entries.flatten() {
        let dir = entry.path();
        if !dir.is_dir() || !dir.join(".git").exists() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            warn!(path = %dir.display(), "skipping repository with a non UTF-8 name");
            continue;
        };
        let path = if parent.ends_with('/') {
            format!("{parent}{name}")
        } else {
            format!("{parent}/{name}")
        };
        debug!(path = %path, "discovered repository");
        found.push(path);
    }
    found
}
