//! core::locations
//!
//! Declarative description of where repositories live, and its JSON store.
//!
//! # Format
//!
//! ```json
//! {
//!   "parentDirectories": ["/work"],
//!   "individualRepositories": ["/other/c"],
//!   "excludeRepositories": ["/work/a"]
//! }
//! ```
//!
//! Field order is irrelevant and a missing field reads as an empty list.
//! Every path is normalized to forward slashes on the way in, so exclusion
//! can match by plain string equality.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or saving a location set.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("failed to read locations file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse locations file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to write locations file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize locations: {0}")]
    Serialize(String),
}

/// Normalize a filesystem path string to forward slashes.
///
/// A trailing separator is dropped (except for a bare root) so that
/// `/work/a/` and `/work/a` compare equal. Only line endings are stripped
/// from the ends; spaces are legal in path names and kept.
///
/// ```
/// use gitfleet::core::locations::normalize_path;
///
/// assert_eq!(normalize_path(r"C:\work\repo"), "C:/work/repo");
/// assert_eq!(normalize_path("/work/a/"), "/work/a");
/// assert_eq!(normalize_path("/"), "/");
/// ```
pub fn normalize_path(path: &str) -> String {
    let slashed = path.trim_matches(['\r', '\n']).replace('\\', "/");
    let trimmed = slashed.trim_end_matches('/');
    if trimmed.is_empty() && slashed.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Which list of a [`RepositoryLocationSet`] an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    Parent,
    Individual,
    Exclude,
}

/// The three ordered path lists that define a fleet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryLocationSet {
    /// Directories whose immediate children are scanned for repositories.
    pub parent_directories: Vec<String>,
    /// Repositories included verbatim.
    pub individual_repositories: Vec<String>,
    /// Paths removed from the result, by exact normalized equality.
    pub exclude_repositories: Vec<String>,
}

impl RepositoryLocationSet {
    /// Build a set from raw path lists, normalizing every entry.
    pub fn new<P, I, E>(parents: P, individual: I, exclude: E) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let mut set = Self::default();
        for p in parents {
            set.add(LocationKind::Parent, p.as_ref());
        }
        for p in individual {
            set.add(LocationKind::Individual, p.as_ref());
        }
        for p in exclude {
            set.add(LocationKind::Exclude, p.as_ref());
        }
        set
    }

    /// Re-normalize every entry. Applied to sets read from disk.
    pub fn normalized(self) -> Self {
        Self::new(
            self.parent_directories,
            self.individual_repositories,
            self.exclude_repositories,
        )
    }

    fn list_mut(&mut self, kind: LocationKind) -> &mut Vec<String> {
        match kind {
            LocationKind::Parent => &mut self.parent_directories,
            LocationKind::Individual => &mut self.individual_repositories,
            LocationKind::Exclude => &mut self.exclude_repositories,
        }
    }

    pub fn list(&self, kind: LocationKind) -> &[String] {
        match kind {
            LocationKind::Parent => &self.parent_directories,
            LocationKind::Individual => &self.individual_repositories,
            LocationKind::Exclude => &self.exclude_repositories,
        }
    }

    /// Append a path to one of the lists.
    ///
    /// Returns `false` if the normalized path was already present.
    pub fn add(&mut self, kind: LocationKind, path: &str) -> bool {
        let path = normalize_path(path);
        let list = self.list_mut(kind);
        if path.is_empty() || list.contains(&path) {
            return false;
        }
        list.push(path);
        true
    }

    /// Remove a path from every list.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove(&mut self, path: &str) -> bool {
        let path = normalize_path(path);
        let mut removed = false;
        for kind in [
            LocationKind::Parent,
            LocationKind::Individual,
            LocationKind::Exclude,
        ] {
            let list = self.list_mut(kind);
            let before = list.len();
            list.retain(|p| p != &path);
            removed |= list.len() != before;
        }
        removed
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude_repositories.iter().any(|e| e == path)
    }

    pub fn is_empty(&self) -> bool {
        self.parent_directories.is_empty() && self.individual_repositories.is_empty()
    }
}

/// JSON persistence for a [`RepositoryLocationSet`].
#[derive(Debug, Clone)]
pub struct LocationStore {
    path: PathBuf,
}

impl LocationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the location set.
    ///
    /// A missing file yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Read`] if the file exists but cannot be read
    /// and [`LocationError::Parse`] if it is not a valid location set.
    pub fn load(&self) -> Result<RepositoryLocationSet, LocationError> {
        if !self.path.exists() {
            return Ok(RepositoryLocationSet::default());
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| LocationError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        Self::parse(&contents).map_err(|message| LocationError::Parse {
            path: self.path.clone(),
            message,
        })
    }

    /// Parse a location set from a JSON string.
    pub fn parse(json: &str) -> Result<RepositoryLocationSet, String> {
        if json.trim().is_empty() {
            return Ok(RepositoryLocationSet::default());
        }
        serde_json::from_str::<RepositoryLocationSet>(json)
            .map(RepositoryLocationSet::normalized)
            .map_err(|e| e.to_string())
    }

    /// Persist the location set as pretty JSON.
    ///
    /// Creates parent directories if needed and writes through a temp file
    /// and rename so a crash never leaves a truncated file.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Write`] on any filesystem failure.
    pub fn save(&self, set: &RepositoryLocationSet) -> Result<(), LocationError> {
        let write_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| LocationError::Write { path, source }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err(&self.path))?;
            }
        }

        let contents = serde_json::to_string_pretty(set)
            .map_err(|e| LocationError::Serialize(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).map_err(write_err(&temp_path))?;
        file.write_all(contents.as_bytes())
            .map_err(write_err(&temp_path))?;
        file.sync_all().map_err(write_err(&temp_path))?;

        fs::rename(&temp_path, &self.path).map_err(write_err(&self.path))?;
        Ok(())
    }
}
