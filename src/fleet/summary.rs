//! fleet::summary
//!
//! Folds per-repository flags into fleet-wide counters.
//!
//! Every handle is classified; a failing repository only affects its own
//! contribution. Counters are commutative, so visitation order does not
//! matter.

use std::fmt;

use serde::Serialize;

use super::classify::{classify, RepositoryStateFlags};
use super::locator::RepositoryHandle;
use crate::git::Backend;

/// Fleet-wide counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetCounts {
    pub total: usize,
    pub dirty: usize,
    pub ahead: usize,
    pub behind: usize,
    pub non_tracking_ahead: usize,
    pub non_tracking_behind: usize,
    pub not_tracking: usize,
    pub not_found: usize,
    pub no_remote_branches: usize,
}

impl FleetCounts {
    /// Add one repository's flags.
    pub fn add(&mut self, flags: &RepositoryStateFlags) {
        self.total += 1;
        self.dirty += usize::from(flags.is_dirty());
        self.ahead += usize::from(flags.ahead);
        self.behind += usize::from(flags.behind);
        self.non_tracking_ahead += usize::from(flags.non_tracking_ahead);
        self.non_tracking_behind += usize::from(flags.non_tracking_behind);
        self.not_tracking += usize::from(flags.not_tracking);
        self.not_found += usize::from(flags.not_found);
        self.no_remote_branches += usize::from(flags.no_remote_branches);
    }
}

impl<'a> FromIterator<&'a RepositoryStateFlags> for FleetCounts {
    fn from_iter<I: IntoIterator<Item = &'a RepositoryStateFlags>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut counts, flags| {
            counts.add(flags);
            counts
        })
    }
}

impl fmt::Display for FleetCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Total: {}, Dirty: {}, Behind: {}, Non-Tracking Behind: {}, Ahead: {}, Non-Tracking Ahead: {}",
            self.total,
            self.dirty,
            self.behind,
            self.non_tracking_behind,
            self.ahead,
            self.non_tracking_ahead
        )?;
        write!(
            f,
            "Not tracking: {}, No remote branches: {}, Not found: {}",
            self.not_tracking, self.no_remote_branches, self.not_found
        )
    }
}

/// Classify every handle, in order.
pub fn classify_all<B: Backend>(
    backend: &B,
    handles: &[RepositoryHandle],
) -> Vec<(RepositoryHandle, RepositoryStateFlags)> {
    handles
        .iter()
        .map(|handle| (handle.clone(), classify(backend, handle)))
        .collect()
}

/// Classify every handle and fold the results.
pub fn summarize<B: Backend>(backend: &B, handles: &[RepositoryHandle]) -> FleetCounts {
    handles.iter().map(|h| classify(backend, h)).fold(
        FleetCounts::default(),
        |mut counts, flags| {
            counts.add(&flags);
            counts
        },
    )
}

/// Counters plus the repositories behind each non-zero counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetDetails {
    pub counts: FleetCounts,
    pub dirty: Vec<String>,
    pub behind: Vec<String>,
    pub ahead: Vec<String>,
    pub non_tracking_behind: Vec<String>,
    pub non_tracking_ahead: Vec<String>,
    pub not_tracking: Vec<String>,
    pub no_remote_branches: Vec<String>,
    pub not_found: Vec<String>,
}

impl FleetDetails {
    pub fn from_classified(classified: &[(RepositoryHandle, RepositoryStateFlags)]) -> Self {
        let mut details = Self::default();
        for (handle, flags) in classified {
            details.counts.add(flags);
            let path = handle.path();
            let lists = [
                (flags.is_dirty(), &mut details.dirty),
                (flags.behind, &mut details.behind),
                (flags.ahead, &mut details.ahead),
                (flags.non_tracking_behind, &mut details.non_tracking_behind),
                (flags.non_tracking_ahead, &mut details.non_tracking_ahead),
                (flags.not_tracking, &mut details.not_tracking),
                (flags.no_remote_branches, &mut details.no_remote_branches),
                (flags.not_found, &mut details.not_found),
            ];
            for (set, list) in lists {
                if set {
                    list.push(path.to_string());
                }
            }
        }
        details
    }
}

impl fmt::Display for FleetDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.counts)?;
        let sections = [
            ("Dirty", &self.dirty),
            ("Behind", &self.behind),
            ("Ahead", &self.ahead),
            ("Non-Tracking Behind", &self.non_tracking_behind),
            ("Non-Tracking Ahead", &self.non_tracking_ahead),
            ("Not Tracking", &self.not_tracking),
            ("No Remote Branches", &self.no_remote_branches),
            ("Not Found", &self.not_found),
        ];
        for (title, paths) in sections {
            if paths.is_empty() {
                continue;
            }
            write!(f, "\n\n{title}")?;
            for path in paths {
                write!(f, "\n    {path}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::{FailOn, MockBackend, MockRepo};
    use crate::git::WorktreeStatus;

    fn clean_tracked() -> MockRepo {
        let mut repo = MockRepo::new();
        let root = repo.commit(&[]);
        repo.local("main", &root)
            .remote("origin/main", &root)
            .track("main", "origin/main");
        repo
    }

    fn dirty() -> MockRepo {
        let mut repo = clean_tracked();
        repo.set_status(WorktreeStatus {
            untracked: 2,
            ..Default::default()
        });
        repo
    }

    fn behind() -> MockRepo {
        let mut repo = MockRepo::new();
        let root = repo.commit(&[]);
        let theirs = repo.chain(&root, 1);
        repo.local("main", &root)
            .remote("origin/main", &theirs)
            .track("main", "origin/main");
        repo
    }

    fn fleet() -> (MockBackend, Vec<RepositoryHandle>) {
        let backend = MockBackend::new()
            .with_repo("/w/clean", clean_tracked())
            .with_repo("/w/dirty", dirty())
            .with_repo("/w/behind", behind());
        let handles = ["/w/behind", "/w/clean", "/w/dirty", "/w/gone"]
            .into_iter()
            .map(RepositoryHandle::new)
            .collect();
        (backend, handles)
    }

    #[test]
    fn counts_every_handle() {
        let (backend, handles) = fleet();
        let counts = summarize(&backend, &handles);

        assert_eq!(counts.total, 4);
        // The missing repository is never clean.
        assert_eq!(counts.dirty, 2);
        assert_eq!(counts.behind, 1);
        assert_eq!(counts.ahead, 0);
        assert_eq!(counts.not_found, 1);
        assert_eq!(counts.no_remote_branches, 0);
    }

    #[test]
    fn failing_repository_does_not_stop_the_fold() {
        let mut broken = clean_tracked();
        broken.fail_on(FailOn::Status);
        let backend = MockBackend::new()
            .with_repo("/w/broken", broken)
            .with_repo("/w/clean", clean_tracked());
        let handles = vec![RepositoryHandle::new("/w/broken"), RepositoryHandle::new("/w/clean")];

        let counts = summarize(&backend, &handles);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.dirty, 1);
    }

    #[test]
    fn order_independent() {
        let (backend, mut handles) = fleet();
        let forward = summarize(&backend, &handles);
        handles.reverse();
        assert_eq!(summarize(&backend, &handles), forward);
    }

    #[test]
    fn empty_fleet() {
        let counts = summarize(&MockBackend::new(), &[]);
        assert_eq!(counts, FleetCounts::default());
    }

    #[test]
    fn collect_from_flags() {
        let flags = [RepositoryStateFlags::not_found(), RepositoryStateFlags::default()];
        let counts: FleetCounts = flags.iter().collect();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.not_found, 1);
    }

    #[test]
    fn display_format() {
        let counts = FleetCounts {
            total: 5,
            dirty: 1,
            ahead: 2,
            behind: 3,
            non_tracking_ahead: 4,
            non_tracking_behind: 6,
            not_tracking: 7,
            not_found: 8,
            no_remote_branches: 9,
        };
        assert_eq!(
            counts.to_string(),
            "Total: 5, Dirty: 1, Behind: 3, Non-Tracking Behind: 6, Ahead: 2, Non-Tracking Ahead: 4\n\
             Not tracking: 7, No remote branches: 9, Not found: 8"
        );
    }

    #[test]
    fn details_list_paths_per_category() {
        let (backend, handles) = fleet();
        let details = FleetDetails::from_classified(&classify_all(&backend, &handles));

        assert_eq!(details.counts, summarize(&backend, &handles));
        assert_eq!(details.dirty, vec!["/w/dirty", "/w/gone"]);
        assert_eq!(details.behind, vec!["/w/behind"]);
        assert_eq!(details.not_found, vec!["/w/gone"]);
        assert!(details.ahead.is_empty());

        let text = details.to_string();
        assert!(text.contains("\n\nBehind\n    /w/behind"));
        assert!(!text.contains("\n\nAhead\n"));
    }
}
