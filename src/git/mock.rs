//! git::mock
//!
//! In-memory backend for deterministic testing.
//!
//! # Design
//!
//! A [`MockRepo`] holds a small commit graph, branch refs, upstream
//! configuration and a canned working-tree status. [`MockBackend`] maps
//! paths to repos; opening an unknown path yields [`GitError::NotARepo`].
//! Individual queries can be configured to fail to exercise error paths.
//!
//! # Example
//!
//! ```
//! use gitfleet::git::mock::{MockBackend, MockRepo};
//! use gitfleet::git::{Backend, BackendRepo};
//! use std::path::Path;
//!
//! let mut repo = MockRepo::new();
//! let base = repo.commit(&[]);
//! let tip = repo.commit(&[&base]);
//! repo.local("main", &tip).remote("origin/main", &base).track("main", "origin/main");
//!
//! let backend = MockBackend::new().with_repo("/work/a", repo);
//! let opened = backend.open(Path::new("/work/a")).unwrap();
//! assert_eq!(opened.count_reachable(&tip, Some(&base)).unwrap(), 1);
//! assert!(backend.open(Path::new("/work/b")).is_err());
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use super::backend::{Backend, BackendRepo};
use super::interface::{GitError, RemoteInfo, WorktreeStatus};
use crate::core::locations::normalize_path;
use crate::core::types::{BranchRef, Oid, RefName, RefTarget};

/// Which query a [`MockRepo`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    /// Opening an existing repository fails with an access error.
    Open,
    Status,
    LocalBranches,
    RemoteBranches,
    Tracking,
}

/// An in-memory repository.
#[derive(Debug, Clone, Default)]
pub struct MockRepo {
    /// Parents of every known commit.
    parents: HashMap<Oid, Vec<Oid>>,
    next_commit: u64,
    status: WorktreeStatus,
    current: Option<RefName>,
    locals: Vec<BranchRef>,
    remotes_tracking: Vec<BranchRef>,
    upstreams: HashMap<RefName, RefName>,
    remotes: Vec<RemoteInfo>,
    fail_on: Option<FailOn>,
}

impl MockRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit with the given parents and return its id.
    pub fn commit(&mut self, parents: &[&Oid]) -> Oid {
        self.next_commit += 1;
        let oid = Self::oid_for(self.next_commit);
        self.parents
            .insert(oid.clone(), parents.iter().map(|p| (*p).clone()).collect());
        oid
    }

    /// Add a linear chain of `n` commits on top of `base`, returning the tip.
    pub fn chain(&mut self, base: &Oid, n: usize) -> Oid {
        let mut tip = base.clone();
        for _ in 0..n {
            tip = self.commit(&[&tip]);
        }
        tip
    }

    /// An id that is valid but not present in the graph.
    pub fn dangling_oid() -> Oid {
        Self::oid_for(u64::MAX)
    }

    fn oid_for(n: u64) -> Oid {
        Oid::new(format!("{n:040x}")).expect("zero-padded counter is a valid oid")
    }

    /// Create local branch `refs/heads/<name>` at `target`.
    pub fn local(&mut self, name: &str, target: &Oid) -> &mut Self {
        let name = Self::ref_name(&format!("refs/heads/{name}"));
        self.locals
            .push(BranchRef::local(name, RefTarget::Commit(target.clone())));
        self
    }

    /// Create a local branch whose target cannot be resolved.
    pub fn local_unresolved(&mut self, name: &str) -> &mut Self {
        let name = Self::ref_name(&format!("refs/heads/{name}"));
        self.locals.push(BranchRef::local(name, RefTarget::Unresolved));
        self
    }

    /// Create remote-tracking branch `refs/remotes/<name>` at `target`.
    pub fn remote(&mut self, name: &str, target: &Oid) -> &mut Self {
        let name = Self::ref_name(&format!("refs/remotes/{name}"));
        if let Some((remote, _)) = name.shorthand().split_once('/') {
            if !self.remotes.iter().any(|r| r.name == remote) {
                self.remotes.push(RemoteInfo {
                    name: remote.to_string(),
                    url: Some(format!("https://example.com/{remote}.git")),
                });
            }
        }
        self.remotes_tracking
            .push(BranchRef::remote_tracking(name, RefTarget::Commit(target.clone())));
        self
    }

    /// Configure `local` (short name) to track `remote` (e.g. `origin/main`).
    pub fn track(&mut self, local: &str, remote: &str) -> &mut Self {
        self.upstreams.insert(
            Self::ref_name(&format!("refs/heads/{local}")),
            Self::ref_name(&format!("refs/remotes/{remote}")),
        );
        self
    }

    /// Check out local branch `name`.
    pub fn checkout(&mut self, name: &str) -> &mut Self {
        self.current = Some(Self::ref_name(&format!("refs/heads/{name}")));
        self
    }

    pub fn set_status(&mut self, status: WorktreeStatus) -> &mut Self {
        self.status = status;
        self
    }

    pub fn fail_on(&mut self, fail_on: FailOn) -> &mut Self {
        self.fail_on = Some(fail_on);
        self
    }

    fn ref_name(name: &str) -> RefName {
        RefName::new(name).unwrap_or_else(|e| panic!("mock ref name: {e}"))
    }

    fn check(&self, query: FailOn) -> Result<(), GitError> {
        if self.fail_on == Some(query) {
            return Err(GitError::Internal {
                message: format!("injected failure: {query:?}"),
            });
        }
        Ok(())
    }

    /// Every commit reachable from `tip`, including `tip`.
    fn ancestors(&self, tip: &Oid) -> Result<HashSet<Oid>, GitError> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([tip.clone()]);
        while let Some(oid) = queue.pop_front() {
            if !seen.insert(oid.clone()) {
                continue;
            }
            let parents = self.parents.get(&oid).ok_or_else(|| GitError::ObjectNotFound {
                oid: oid.to_string(),
            })?;
            queue.extend(parents.iter().cloned());
        }
        Ok(seen)
    }
}

impl BackendRepo for MockRepo {
    fn worktree_status(&self) -> Result<WorktreeStatus, GitError> {
        self.check(FailOn::Status)?;
        Ok(self.status)
    }

    fn current_branch(&self) -> Result<Option<RefName>, GitError> {
        Ok(self.current.clone())
    }

    fn local_branches(&self) -> Result<Vec<BranchRef>, GitError> {
        self.check(FailOn::LocalBranches)?;
        Ok(self.locals.clone())
    }

    fn remote_tracking_branches(&self) -> Result<Vec<BranchRef>, GitError> {
        self.check(FailOn::RemoteBranches)?;
        Ok(self.remotes_tracking.clone())
    }

    fn tracking_branch_for(&self, local: &RefName) -> Result<Option<RefName>, GitError> {
        self.check(FailOn::Tracking)?;
        Ok(self.upstreams.get(local).cloned())
    }

    fn remotes(&self) -> Result<Vec<RemoteInfo>, GitError> {
        Ok(self.remotes.clone())
    }

    fn merge_base(&self, a: &Oid, b: &Oid) -> Result<Option<Oid>, GitError> {
        let from_a = self.ancestors(a)?;
        let from_b = self.ancestors(b)?;

        // Walk b's history breadth-first; the first common commit that no
        // other common commit descends from is the nearest one.
        let common: HashSet<&Oid> = from_a.intersection(&from_b).collect();
        let mut queue = VecDeque::from([b.clone()]);
        let mut visited = HashSet::new();
        while let Some(oid) = queue.pop_front() {
            if !visited.insert(oid.clone()) {
                continue;
            }
            if common.contains(&oid) {
                let shadowed = common
                    .iter()
                    .filter(|c| ***c != oid)
                    .map(|c| self.ancestors(c))
                    .collect::<Result<Vec<_>, _>>()?
                    .iter()
                    .any(|anc| anc.contains(&oid));
                if !shadowed {
                    return Ok(Some(oid));
                }
            }
            if let Some(parents) = self.parents.get(&oid) {
                queue.extend(parents.iter().cloned());
            }
        }
        Ok(None)
    }

    fn count_reachable(&self, tip: &Oid, exclude: Option<&Oid>) -> Result<usize, GitError> {
        let reachable = self.ancestors(tip)?;
        let hidden = match exclude {
            Some(base) => self.ancestors(base)?,
            None => HashSet::new(),
        };
        Ok(reachable.difference(&hidden).count())
    }
}

/// A set of in-memory repositories keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    repos: HashMap<String, MockRepo>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, path: &str, repo: MockRepo) -> Self {
        self.repos.insert(normalize_path(path), repo);
        self
    }
}

impl Backend for MockBackend {
    type Repo = MockRepo;

    fn open(&self, path: &Path) -> Result<MockRepo, GitError> {
        let key = normalize_path(&path.to_string_lossy());
        let repo = self.repos.get(&key).ok_or_else(|| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        if repo.fail_on == Some(FailOn::Open) {
            return Err(GitError::AccessError {
                message: format!("injected failure opening {key}"),
            });
        }
        Ok(repo.clone())
    }
}
