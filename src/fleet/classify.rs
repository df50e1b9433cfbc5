//! fleet::classify
//!
//! Derives the multi-flag state of one repository.
//!
//! # Decision process
//!
//! 1. Open the repository. No repository metadata is terminal: only
//!    `not_found` is set.
//! 2. `clean` comes from the working-tree status.
//! 3. No local branches: stop, leaving the divergence flags unset.
//! 4. No remote-tracking branches at all: set `no_remote_branches` and stop.
//! 5. Otherwise every `(local, remote)` pair is compared. A pair whose remote
//!    is the local branch's configured upstream feeds `ahead`/`behind`;
//!    every other pair feeds `non_tracking_ahead`/`non_tracking_behind`. A
//!    pair whose divergence cannot be computed sets `not_tracking`.
//!
//! Upstreams are looked up per local branch. The checked-out branch's
//! upstream is not applied to the other branches; it only appears as the
//! "Tracking Branch" line of a [`RepositoryReport`](super::report::RepositoryReport).
//!
//! Flags only ever go from `false` to `true` during a pass.
//!
//! # Failures
//!
//! Any backend failure after a successful open (status, branch enumeration,
//! upstream lookup) degrades the whole result to all-false. The repository
//! is then indistinguishable from a dirty one with no drift; the failure is
//! logged at `warn`.

use serde::Serialize;
use tracing::{debug, warn};

use super::divergence::{Divergence, DivergenceCalculator};
use super::locator::RepositoryHandle;
use crate::core::types::TrackingRelation;
use crate::git::{Backend, BackendRepo, GitError};

/// State flags for one repository, recomputed on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryStateFlags {
    pub clean: bool,
    pub not_found: bool,
    pub no_remote_branches: bool,
    pub ahead: bool,
    pub behind: bool,
    pub non_tracking_ahead: bool,
    pub non_tracking_behind: bool,
    pub not_tracking: bool,
}

impl RepositoryStateFlags {
    /// The terminal state for a path with no repository.
    pub fn not_found() -> Self {
        Self {
            not_found: true,
            ..Self::default()
        }
    }

    /// Fold one pair's divergence into the flags.
    pub fn record(&mut self, tracked: bool, divergence: Divergence) {
        if !divergence.is_computable() {
            self.not_tracking = true;
            return;
        }
        if tracked {
            self.ahead |= divergence.is_ahead();
            self.behind |= divergence.is_behind();
        } else {
            self.non_tracking_ahead |= divergence.is_ahead();
            self.non_tracking_behind |= divergence.is_behind();
        }
    }

    /// A repository counts as dirty whenever it is not known to be clean.
    pub fn is_dirty(&self) -> bool {
        !self.clean
    }

    /// Short state marker, most significant condition first.
    pub fn marker(&self) -> &'static str {
        if self.not_found {
            "not-found"
        } else if self.no_remote_branches {
            "no-remote"
        } else if self.not_tracking {
            "not-tracking"
        } else if self.behind {
            "behind"
        } else if self.ahead {
            "ahead"
        } else if self.non_tracking_behind {
            "nt-behind"
        } else if self.non_tracking_ahead {
            "nt-ahead"
        } else if self.is_dirty() {
            "dirty"
        } else {
            "clean"
        }
    }
}

/// Classify the repository behind `handle`.
///
/// Never fails; see the module docs for how failures degrade.
pub fn classify<B: Backend>(backend: &B, handle: &RepositoryHandle) -> RepositoryStateFlags {
    let repo = match handle.open(backend) {
        Ok(repo) => repo,
        Err(GitError::NotARepo { .. }) => {
            debug!(path = %handle, "repository not found");
            return RepositoryStateFlags::not_found();
        }
        Err(e) => {
            warn!(path = %handle, error = %e, "cannot open repository");
            return RepositoryStateFlags::default();
        }
    };

    match classify_repo(&repo) {
        Ok(flags) => {
            debug!(path = %handle, ?flags, "classified");
            flags
        }
        Err(e) => {
            warn!(path = %handle, error = %e, "classification failed, reporting no state");
            RepositoryStateFlags::default()
        }
    }
}

/// Classify an already-open repository, surfacing backend failures.
pub fn classify_repo<R: BackendRepo>(repo: &R) -> Result<RepositoryStateFlags, GitError> {
    let mut flags = RepositoryStateFlags {
        clean: repo.worktree_status()?.is_clean(),
        ..RepositoryStateFlags::default()
    };

    let locals = repo.local_branches()?;
    if locals.is_empty() {
        return Ok(flags);
    }

    let remotes = repo.remote_tracking_branches()?;
    if remotes.is_empty() {
        flags.no_remote_branches = true;
        return Ok(flags);
    }

    let mut calculator = DivergenceCalculator::new(repo);
    for local in &locals {
        let tracking = TrackingRelation {
            local: local.name().clone(),
            upstream: repo.tracking_branch_for(local.name())?,
        };
        for remote in &remotes {
            let divergence = calculator.calculate(local, remote);
            flags.record(tracking.is_tracked_by(remote.name()), divergence);
        }
    }

    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::{FailOn, MockBackend, MockRepo};
    use crate::git::WorktreeStatus;

    fn classify_mock(repo: MockRepo) -> RepositoryStateFlags {
        let backend = MockBackend::new().with_repo("/work/repo", repo);
        classify(&backend, &RepositoryHandle::new("/work/repo"))
    }

    mod flags {
        use super::*;

        #[test]
        fn not_found_sets_only_not_found() {
            let flags = RepositoryStateFlags::not_found();
            assert_eq!(
                flags,
                RepositoryStateFlags {
                    not_found: true,
                    ..Default::default()
                }
            );
        }

        #[test]
        fn record_routes_by_tracking() {
            let mut flags = RepositoryStateFlags::default();
            flags.record(true, Divergence::counts(1, 0));
            flags.record(false, Divergence::counts(0, 2));
            assert!(flags.ahead);
            assert!(!flags.behind);
            assert!(!flags.non_tracking_ahead);
            assert!(flags.non_tracking_behind);
            assert!(!flags.not_tracking);
        }

        #[test]
        fn record_never_clears() {
            let mut flags = RepositoryStateFlags::default();
            flags.record(true, Divergence::counts(3, 0));
            flags.record(true, Divergence::counts(0, 0));
            assert!(flags.ahead);
        }

        #[test]
        fn sentinel_sets_not_tracking_either_way() {
            let mut tracked = RepositoryStateFlags::default();
            tracked.record(true, Divergence::NotComputable);
            let mut untracked = RepositoryStateFlags::default();
            untracked.record(false, Divergence::NotComputable);
            assert!(tracked.not_tracking);
            assert!(untracked.not_tracking);
            assert!(!tracked.ahead && !tracked.behind);
        }

        #[test]
        fn markers() {
            assert_eq!(RepositoryStateFlags::not_found().marker(), "not-found");
            assert_eq!(RepositoryStateFlags::default().marker(), "dirty");
            let clean = RepositoryStateFlags {
                clean: true,
                ..Default::default()
            };
            assert_eq!(clean.marker(), "clean");
        }

        #[test]
        fn serializes_camel_case() {
            let json = serde_json::to_value(RepositoryStateFlags::not_found()).unwrap();
            assert_eq!(json["notFound"], true);
            assert_eq!(json["nonTrackingAhead"], false);
        }
    }

    mod scenarios {
        use super::*;

        #[test]
        fn tracked_branch_two_ahead_one_behind() {
            let mut repo = MockRepo::new();
            let root = repo.commit(&[]);
            let ours = repo.chain(&root, 2);
            let theirs = repo.chain(&root, 1);
            repo.local("main", &ours)
                .remote("origin/main", &theirs)
                .track("main", "origin/main")
                .checkout("main");

            let flags = classify_mock(repo);
            assert!(flags.clean);
            assert!(flags.ahead);
            assert!(flags.behind);
            assert!(!flags.not_tracking);
            assert!(!flags.non_tracking_ahead);
            assert!(!flags.non_tracking_behind);
        }

        #[test]
        fn untracked_branch_drifts_as_non_tracking() {
            let mut repo = MockRepo::new();
            let root = repo.commit(&[]);
            let ours = repo.chain(&root, 3);
            repo.local("main", &ours).remote("origin/main", &root);

            let flags = classify_mock(repo);
            assert!(flags.non_tracking_ahead);
            assert!(!flags.non_tracking_behind);
            assert!(!flags.ahead);
            assert!(!flags.behind);
        }

        #[test]
        fn cross_product_covers_non_upstream_pairs() {
            let mut repo = MockRepo::new();
            let root = repo.commit(&[]);
            let feature = repo.chain(&root, 2);
            repo.local("main", &root)
                .remote("origin/main", &root)
                .remote("origin/feature", &feature)
                .track("main", "origin/main");

            let flags = classify_mock(repo);
            assert!(!flags.ahead && !flags.behind);
            assert!(flags.non_tracking_behind);
        }

        #[test]
        fn checked_out_upstream_not_shared_with_other_branches() {
            let mut repo = MockRepo::new();
            let root = repo.commit(&[]);
            let topic = repo.chain(&root, 2);
            repo.local("main", &root)
                .local("topic", &topic)
                .remote("origin/main", &root)
                .track("main", "origin/main")
                .checkout("main");

            let flags = classify_mock(repo);
            assert!(!flags.ahead);
            assert!(flags.non_tracking_ahead);
        }

        #[test]
        fn no_remote_branches() {
            let mut repo = MockRepo::new();
            let root = repo.commit(&[]);
            repo.local("main", &root);

            let flags = classify_mock(repo);
            assert!(flags.no_remote_branches);
            assert!(!flags.ahead && !flags.behind);
            assert!(!flags.non_tracking_ahead && !flags.non_tracking_behind);
            assert!(!flags.not_tracking);
        }

        #[test]
        fn no_local_branches_leaves_defaults() {
            let mut repo = MockRepo::new();
            let root = repo.commit(&[]);
            repo.remote("origin/main", &root);

            let flags = classify_mock(repo);
            assert!(flags.clean);
            assert!(!flags.no_remote_branches);
            assert!(!flags.not_tracking);
        }

        #[test]
        fn dirty_worktree() {
            let mut repo = MockRepo::new();
            repo.set_status(WorktreeStatus {
                modified: 1,
                ..Default::default()
            });
            let flags = classify_mock(repo);
            assert!(!flags.clean);
            assert!(flags.is_dirty());
        }

        #[test]
        fn unresolved_local_is_not_tracking() {
            let mut repo = MockRepo::new();
            let root = repo.commit(&[]);
            repo.local_unresolved("broken")
                .remote("origin/main", &root)
                .track("broken", "origin/main");

            let flags = classify_mock(repo);
            assert!(flags.not_tracking);
            assert!(!flags.ahead && !flags.behind);
        }

        #[test]
        fn missing_path_is_not_found() {
            let backend = MockBackend::new();
            let flags = classify(&backend, &RepositoryHandle::new("/nowhere"));
            assert_eq!(flags, RepositoryStateFlags::not_found());
        }
    }

    mod failures {
        use super::*;

        fn failing(fail_on: FailOn) -> RepositoryStateFlags {
            let mut repo = MockRepo::new();
            let root = repo.commit(&[]);
            let ahead = repo.chain(&root, 1);
            repo.local("main", &ahead)
                .remote("origin/main", &root)
                .track("main", "origin/main")
                .fail_on(fail_on);
            classify_mock(repo)
        }

        #[test]
        fn every_failure_degrades_to_all_false() {
            for fail_on in [
                FailOn::Open,
                FailOn::Status,
                FailOn::LocalBranches,
                FailOn::RemoteBranches,
                FailOn::Tracking,
            ] {
                assert_eq!(
                    failing(fail_on),
                    RepositoryStateFlags::default(),
                    "{fail_on:?}"
                );
            }
        }
    }
}
