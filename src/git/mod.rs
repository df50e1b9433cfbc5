//! git
//!
//! Single interface for all repository backend operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module imports
//! `git2`. The fleet layer depends on the [`Backend`] / [`BackendRepo`]
//! traits; [`Git2Backend`] is the production implementation and
//! [`mock::MockBackend`] the in-memory one used by tests.
//!
//! # Responsibilities
//!
//! - Opening a repository at an exact path (no upward discovery)
//! - Working-tree status per change category
//! - Local / remote-tracking branch enumeration and upstream lookup
//! - Ancestry queries (merge-base, reachable-commit counts)
//! - Remote listing
//!
//! # Example
//!
//! ```ignore
//! use gitfleet::git::{Backend, BackendRepo, Git2Backend};
//! use std::path::Path;
//!
//! let repo = Git2Backend.open(Path::new("/work/repo"))?;
//! for branch in repo.local_branches()? {
//!     println!("{}", branch.name());
//! }
//! ```

mod backend;
mod interface;
pub mod mock;

pub use backend::{Backend, BackendRepo, Git2Backend};
pub use interface::{Git, GitError, RemoteInfo, WorktreeStatus};
