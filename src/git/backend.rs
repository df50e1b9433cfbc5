//! git::backend
//!
//! Trait seam between the classification core and a VCS backend.
//!
//! # Design
//!
//! The fleet layer only ever talks to [`Backend`] and [`BackendRepo`]. The
//! production implementation is [`Git2Backend`], which opens [`Git`]
//! handles; tests use [`super::mock::MockBackend`]. Each opened repository
//! is independent and is closed when dropped.

use std::path::Path;

use super::interface::{Git, GitError, RemoteInfo, WorktreeStatus};
use crate::core::types::{BranchRef, Oid, RefName};

/// Opens repositories.
pub trait Backend {
    /// The open-repository type.
    type Repo: BackendRepo;

    /// Open the repository at `path`.
    ///
    /// # Errors
    ///
    /// Must return [`GitError::NotARepo`] when no repository exists at
    /// `path`; any other error means the repository exists but could not
    /// be read.
    fn open(&self, path: &Path) -> Result<Self::Repo, GitError>;
}

/// Read-only queries against one open repository.
pub trait BackendRepo {
    /// Per-category counts of pending changes.
    fn worktree_status(&self) -> Result<WorktreeStatus, GitError>;

    /// The checked-out branch, or `None` when HEAD is detached or unborn.
    fn current_branch(&self) -> Result<Option<RefName>, GitError>;

    fn local_branches(&self) -> Result<Vec<BranchRef>, GitError>;

    fn remote_tracking_branches(&self) -> Result<Vec<BranchRef>, GitError>;

    /// Configured upstream of `local`, or `None` if it tracks nothing.
    fn tracking_branch_for(&self, local: &RefName) -> Result<Option<RefName>, GitError>;

    fn remotes(&self) -> Result<Vec<RemoteInfo>, GitError>;

    /// Nearest common ancestor, or `None` for unrelated histories.
    ///
    /// # Errors
    ///
    /// Fails if either commit cannot be read.
    fn merge_base(&self, a: &Oid, b: &Oid) -> Result<Option<Oid>, GitError>;

    /// Commits reachable from `tip` but not from `exclude`.
    fn count_reachable(&self, tip: &Oid, exclude: Option<&Oid>) -> Result<usize, GitError>;
}

/// The production backend, backed by git2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2Backend;

impl Backend for Git2Backend {
    type Repo = Git;

    fn open(&self, path: &Path) -> Result<Git, GitError> {
        Git::open(path)
    }
}

impl BackendRepo for Git {
    fn worktree_status(&self) -> Result<WorktreeStatus, GitError> {
        Git::worktree_status(self)
    }

    fn current_branch(&self) -> Result<Option<RefName>, GitError> {
        Git::current_branch(self)
    }

    fn local_branches(&self) -> Result<Vec<BranchRef>, GitError> {
        Git::local_branches(self)
    }

    fn remote_tracking_branches(&self) -> Result<Vec<BranchRef>, GitError> {
        Git::remote_tracking_branches(self)
    }

    fn tracking_branch_for(&self, local: &RefName) -> Result<Option<RefName>, GitError> {
        Git::tracking_branch_for(self, local)
    }

    fn remotes(&self) -> Result<Vec<RemoteInfo>, GitError> {
        Git::remotes(self)
    }

    fn merge_base(&self, a: &Oid, b: &Oid) -> Result<Option<Oid>, GitError> {
        Git::merge_base(self, a, b)
    }

    fn count_reachable(&self, tip: &Oid, exclude: Option<&Oid>) -> Result<usize, GitError> {
        Git::count_reachable(self, tip, exclude)
    }
}
