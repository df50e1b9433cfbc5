//! fleet::divergence
//!
//! Ahead/behind counts between two branch tips.
//!
//! # Algorithm
//!
//! 1. Both refs must have resolved to commits.
//! 2. Find the merge base (nearest common ancestor) of the two tips.
//! 3. `ahead` = commits reachable from the local tip but not from the base;
//!    `behind` = commits reachable from the remote tip but not from the base.
//!    Unrelated histories have no base, so every reachable commit counts.
//!
//! Any failure (unresolved ref, missing object, corrupt repository) yields
//! [`Divergence::NotComputable`] instead of an error.
//!
//! # Properties
//!
//! - `calculate(a, a)` is `(0, 0)` for any resolvable ref.
//! - `calculate(a, b) == calculate(b, a).swapped()`.

use std::collections::HashMap;

use tracing::debug;

use crate::core::types::{BranchRef, Oid};
use crate::git::{BackendRepo, GitError};

/// Result of comparing two branch tips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Divergence {
    /// Commit counts on each side of the merge base.
    Counts { ahead: usize, behind: usize },
    /// One of the refs could not be resolved or walked.
    NotComputable,
}

impl Divergence {
    /// Value reported for each count when the divergence is not computable.
    pub const SENTINEL: i64 = -1;

    pub fn counts(ahead: usize, behind: usize) -> Self {
        Divergence::Counts { ahead, behind }
    }

    /// `(ahead, behind)`, or `(-1, -1)` when not computable.
    pub fn pair(&self) -> (i64, i64) {
        match *self {
            Divergence::Counts { ahead, behind } => (
                i64::try_from(ahead).unwrap_or(i64::MAX),
                i64::try_from(behind).unwrap_or(i64::MAX),
            ),
            Divergence::NotComputable => (Self::SENTINEL, Self::SENTINEL),
        }
    }

    pub fn is_computable(&self) -> bool {
        matches!(self, Divergence::Counts { .. })
    }

    pub fn is_ahead(&self) -> bool {
        matches!(self, Divergence::Counts { ahead, .. } if *ahead > 0)
    }

    pub fn is_behind(&self) -> bool {
        matches!(self, Divergence::Counts { behind, .. } if *behind > 0)
    }

    /// The same comparison seen from the other side.
    pub fn swapped(self) -> Self {
        match self {
            Divergence::Counts { ahead, behind } => Divergence::Counts {
                ahead: behind,
                behind: ahead,
            },
            Divergence::NotComputable => Divergence::NotComputable,
        }
    }
}

impl std::fmt::Display for Divergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Divergence::Counts { ahead, behind } => {
                write!(f, "Commits ahead : {ahead} Commits behind : {behind}")
            }
            Divergence::NotComputable => f.write_str("Not computable"),
        }
    }
}

/// Computes divergences against one open repository.
///
/// Merge bases are memoized for the lifetime of the calculator, which is
/// meant to be a single classification pass over one repository. The cache
/// never changes results; it only saves repeated walks when several branches
/// share tips.
pub struct DivergenceCalculator<'r, R: BackendRepo> {
    repo: &'r R,
    merge_bases: HashMap<(Oid, Oid), Option<Oid>>,
}

impl<'r, R: BackendRepo> DivergenceCalculator<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self {
            repo,
            merge_bases: HashMap::new(),
        }
    }

    /// Compare `local` against `remote`.
    pub fn calculate(&mut self, local: &BranchRef, remote: &BranchRef) -> Divergence {
        match self.try_calculate(local, remote) {
            Ok((ahead, behind)) => {
                debug!(
                    local = %local.name(),
                    remote = %remote.name(),
                    ahead,
                    behind,
                    "divergence"
                );
                Divergence::counts(ahead, behind)
            }
            Err(e) => {
                debug!(
                    local = %local.name(),
                    remote = %remote.name(),
                    error = %e,
                    "divergence not computable"
                );
                Divergence::NotComputable
            }
        }
    }

    fn try_calculate(
        &mut self,
        local: &BranchRef,
        remote: &BranchRef,
    ) -> Result<(usize, usize), GitError> {
        let local_tip = resolved(local)?;
        let remote_tip = resolved(remote)?;

        let base = self.merge_base(local_tip, remote_tip)?;

        let ahead = self.repo.count_reachable(local_tip, base.as_ref())?;
        let behind = self.repo.count_reachable(remote_tip, base.as_ref())?;
        Ok((ahead, behind))
    }

    fn merge_base(&mut self, a: &Oid, b: &Oid) -> Result<Option<Oid>, GitError> {
        // Always query in sorted order: with several best common ancestors
        // (criss-cross merges) the backend's pick may depend on argument
        // order, and swapping the refs must only swap the counts.
        let key = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        if let Some(base) = self.merge_bases.get(&key) {
            return Ok(base.clone());
        }
        let base = self.repo.merge_base(&key.0, &key.1)?;
        self.merge_bases.insert(key, base.clone());
        Ok(base)
    }
}

fn resolved(branch: &BranchRef) -> Result<&Oid, GitError> {
    branch.commit().ok_or_else(|| GitError::RefNotFound {
        refname: branch.name().to_string(),
    })
}

/// One-shot divergence without a shared merge-base cache.
pub fn calculate_divergence<R: BackendRepo>(
    repo: &R,
    local: &BranchRef,
    remote: &BranchRef,
) -> Divergence {
    DivergenceCalculator::new(repo).calculate(local, remote)
}
