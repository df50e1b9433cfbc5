//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module is the **single doorway** to the repository backend. Every
//! status query, branch enumeration and ancestry walk flows through [`Git`],
//! which returns strong types and normalizes failures into [`GitError`].
//!
//! # Error Handling
//!
//! - [`GitError::NotARepo`]: No repository metadata at the path
//! - [`GitError::BareRepo`]: Operation needs a working tree
//! - [`GitError::RefNotFound`] / [`GitError::ObjectNotFound`]: Missing data
//! - [`GitError::AccessError`] / [`GitError::Internal`]: Everything else
//!
//! # Example
//!
//! ```ignore
//! use gitfleet::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("/work/repo"))?;
//! let status = git.worktree_status()?;
//! println!("clean: {}", status.is_clean());
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{BranchRef, Oid, RefName, RefTarget, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository exists at the path.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was opened
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository has no working tree")]
    BareRepo,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Invalid ref name format.
    #[error("invalid ref name: {message}")]
    InvalidRefName {
        /// Description of the problem
        message: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error, naming what was being accessed.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match (err.code(), err.class()) {
            (git2::ErrorCode::NotFound, _) if context.starts_with("refs/") => {
                GitError::RefNotFound {
                    refname: context.to_string(),
                }
            }
            (git2::ErrorCode::NotFound, _) => GitError::ObjectNotFound {
                oid: context.to_string(),
            },
            (git2::ErrorCode::InvalidSpec, _) => GitError::InvalidOid {
                oid: context.to_string(),
            },
            (git2::ErrorCode::Locked, _) | (_, git2::ErrorClass::Os) => GitError::AccessError {
                message: format!("{}: {}", context, err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }

    fn internal(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidRefName(msg) => GitError::InvalidRefName { message: msg },
        }
    }
}

/// Per-category counts of pending working-tree changes.
///
/// Categories follow the usual porcelain split: index-vs-HEAD (`added`,
/// `changed`, `removed`), worktree-vs-index (`modified`, `missing`), files
/// unknown to the index (`untracked`, `untracked_folders`, `ignored`) and
/// unmerged entries (`conflicting`, `conflicting_stage_state`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorktreeStatus {
    /// New files staged in the index
    pub added: usize,
    /// Files whose staged content differs from HEAD
    pub changed: usize,
    /// Paths with unresolved merge conflicts
    pub conflicting: usize,
    /// Conflict entries recorded in the index stages
    pub conflicting_stage_state: usize,
    /// Ignored paths not in the index
    pub ignored: usize,
    /// Files in the index but deleted from the working tree
    pub missing: usize,
    /// Files modified in the working tree but not staged
    pub modified: usize,
    /// Files deleted from the index
    pub removed: usize,
    /// Untracked files
    pub untracked: usize,
    /// Untracked directories
    pub untracked_folders: usize,
}

impl WorktreeStatus {
    /// True when nothing is pending in any change category.
    ///
    /// Ignored paths are not pending changes and never make a tree dirty.
    pub fn is_clean(&self) -> bool {
        self.added == 0
            && self.changed == 0
            && self.removed == 0
            && self.missing == 0
            && self.modified == 0
            && self.conflicting == 0
            && self.untracked == 0
            && self.untracked_folders == 0
    }
}

/// A configured remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub name: String,
    pub url: Option<String>,
}

/// The Git interface.
///
/// Wraps an open `git2::Repository`. Dropping it closes the repository.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening
    // =========================================================================

    /// Open the repository rooted exactly at `path`.
    ///
    /// Unlike discovery, parent directories are never searched: a plain
    /// directory nested inside some other working copy is not a repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if there is no repository metadata at `path`
    /// - [`GitError::AccessError`] if the metadata cannot be read
    pub fn open(path: &Path) -> Result<Self, GitError> {
        match git2::Repository::open(path) {
            Ok(repo) => Ok(Self { repo }),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Err(GitError::NotARepo {
                path: path.to_path_buf(),
            }),
            Err(e) => Err(GitError::from_git2(e, &path.display().to_string())),
        }
    }

    // =========================================================================
    // Working Tree Status
    // =========================================================================

    /// Count pending changes per category.
    ///
    /// Untracked and ignored directories are reported as a single entry
    /// rather than recursed into.
    ///
    /// # Errors
    ///
    /// - [`GitError::BareRepo`] if the repository has no working tree
    pub fn worktree_status(&self) -> Result<WorktreeStatus, GitError> {
        if self.repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(false)
            .include_ignored(true)
            .recurse_ignored_dirs(false)
            .exclude_submodules(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::from_git2(e, "status"))?;

        let mut result = WorktreeStatus::default();

        for entry in statuses.iter() {
            let status = entry.status();

            if status.is_conflicted() {
                result.conflicting += 1;
                continue;
            }
            if status.is_ignored() {
                result.ignored += 1;
                continue;
            }

            if status.is_index_new() {
                result.added += 1;
            }
            if status.is_index_modified() || status.is_index_renamed() || status.is_index_typechange()
            {
                result.changed += 1;
            }
            if status.is_index_deleted() {
                result.removed += 1;
            }

            if status.is_wt_modified() || status.is_wt_renamed() || status.is_wt_typechange() {
                result.modified += 1;
            }
            if status.is_wt_deleted() {
                result.missing += 1;
            }
            if status.is_wt_new() {
                // Non-recursed untracked directories come back with a trailing slash.
                if entry.path_bytes().ends_with(b"/") {
                    result.untracked_folders += 1;
                } else {
                    result.untracked += 1;
                }
            }
        }

        let index = self.repo.index().map_err(|e| GitError::from_git2(e, "index"))?;
        if index.has_conflicts() {
            let conflicts = index
                .conflicts()
                .map_err(|e| GitError::from_git2(e, "index"))?;
            result.conflicting_stage_state = conflicts.filter(Result::is_ok).count();
        }

        Ok(result)
    }

    // =========================================================================
    // Branches
    // =========================================================================

    /// Full name of the checked-out branch.
    ///
    /// Returns `None` if HEAD is detached or unborn.
    pub fn current_branch(&self) -> Result<Option<RefName>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                return Ok(None)
            }
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };

        if !head.is_branch() {
            return Ok(None);
        }
        match head.name() {
            Some(name) => Ok(Some(RefName::new(name)?)),
            None => Ok(None),
        }
    }

    /// Local branches, in backend order.
    pub fn local_branches(&self) -> Result<Vec<BranchRef>, GitError> {
        self.branches(git2::BranchType::Local)
    }

    /// Remote-tracking branches, in backend order.
    ///
    /// Symbolic remote refs such as `refs/remotes/origin/HEAD` are aliases
    /// of another remote-tracking branch and are skipped.
    pub fn remote_tracking_branches(&self) -> Result<Vec<BranchRef>, GitError> {
        self.branches(git2::BranchType::Remote)
    }

    fn branches(&self, kind: git2::BranchType) -> Result<Vec<BranchRef>, GitError> {
        let is_local = matches!(kind, git2::BranchType::Local);
        let branches = self.repo.branches(Some(kind)).map_err(GitError::internal)?;

        let mut result = Vec::new();
        for branch in branches {
            let (branch, _) = branch.map_err(GitError::internal)?;
            let reference = branch.get();

            if reference.kind() == Some(git2::ReferenceType::Symbolic) {
                continue;
            }

            // Skip refs with non-UTF8 or invalid names
            let Some(name) = reference.name() else {
                continue;
            };
            let Ok(name) = RefName::new(name) else {
                continue;
            };

            let target = match reference.peel_to_commit() {
                Ok(commit) => match Oid::new(commit.id().to_string()) {
                    Ok(oid) => RefTarget::Commit(oid),
                    Err(_) => RefTarget::Unresolved,
                },
                Err(_) => RefTarget::Unresolved,
            };

            result.push(if is_local {
                BranchRef::local(name, target)
            } else {
                BranchRef::remote_tracking(name, target)
            });
        }

        Ok(result)
    }

    /// Configured upstream of a local branch.
    ///
    /// Reads `branch.<name>.remote` / `branch.<name>.merge` and maps them
    /// through the remote's fetch refspec, so the upstream is reported even
    /// when the remote-tracking ref has not been fetched yet.
    ///
    /// Returns `None` if the branch has no upstream.
    pub fn tracking_branch_for(&self, local: &RefName) -> Result<Option<RefName>, GitError> {
        match self.repo.branch_upstream_name(local.as_str()) {
            Ok(buf) => match buf.as_str() {
                Some(name) => Ok(Some(RefName::new(name)?)),
                None => Ok(None),
            },
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::from_git2(e, local.as_str())),
        }
    }

    // =========================================================================
    // Remotes
    // =========================================================================

    /// Configured remotes with their fetch URLs.
    pub fn remotes(&self) -> Result<Vec<RemoteInfo>, GitError> {
        let names = self.repo.remotes().map_err(GitError::internal)?;

        let mut result = Vec::new();
        for name in names.iter().flatten() {
            let url = self
                .repo
                .find_remote(name)
                .ok()
                .and_then(|r| r.url().map(str::to_string));
            result.push(RemoteInfo {
                name: name.to_string(),
                url,
            });
        }
        Ok(result)
    }

    // =========================================================================
    // Ancestry Queries
    // =========================================================================

    /// Find the nearest common ancestor of two commits.
    ///
    /// Returns `None` if the histories are unrelated.
    pub fn merge_base(&self, oid1: &Oid, oid2: &Oid) -> Result<Option<Oid>, GitError> {
        let a = to_git2(oid1)?;
        let b = to_git2(oid2)?;

        match self.repo.merge_base(a, b) {
            Ok(oid) => Ok(Some(Oid::new(oid.to_string())?)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                // git2 reports both "no common ancestor" and "missing object"
                // as NotFound; only the former is a valid answer.
                self.repo
                    .find_commit(a)
                    .and_then(|_| self.repo.find_commit(b))
                    .map_err(|e| GitError::from_git2(e, "merge-base"))?;
                Ok(None)
            }
            Err(e) => Err(GitError::from_git2(e, "merge-base")),
        }
    }

    /// Count commits reachable from `tip` but not from `exclude`.
    ///
    /// With no `exclude`, counts every commit reachable from `tip`.
    pub fn count_reachable(&self, tip: &Oid, exclude: Option<&Oid>) -> Result<usize, GitError> {
        let mut revwalk = self.repo.revwalk().map_err(GitError::internal)?;

        revwalk
            .push(to_git2(tip)?)
            .map_err(|e| GitError::from_git2(e, tip.as_str()))?;
        if let Some(base) = exclude {
            revwalk
                .hide(to_git2(base)?)
                .map_err(|e| GitError::from_git2(e, base.as_str()))?;
        }

        revwalk.try_fold(0usize, |count, step| {
            step.map(|_| count + 1)
                .map_err(|e| GitError::from_git2(e, tip.as_str()))
        })
    }
}

fn to_git2(oid: &Oid) -> Result<git2::Oid, GitError> {
    git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))
}
