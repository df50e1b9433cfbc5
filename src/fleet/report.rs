//! fleet::report
//!
//! Per-repository report records and their CSV and text renderings.
//!
//! A report is the verbose counterpart of [`RepositoryStateFlags`]: instead
//! of folding divergences into flags it keeps every `(local, remote)` pair
//! with its counts, together with the raw change counts, branch list,
//! remotes and the upstream of the checked-out branch.
//!
//! [`RepositoryStateFlags`]: super::classify::RepositoryStateFlags

use std::fmt::Write as _;
use std::io;

use tracing::warn;

use super::divergence::{Divergence, DivergenceCalculator};
use super::locator::RepositoryHandle;
use crate::core::types::{BranchRef, RefName};
use crate::git::{Backend, BackendRepo, GitError, RemoteInfo, WorktreeStatus};

/// CSV column order.
pub const CSV_HEADINGS: [&str; 18] = [
    "Name",
    "Clean",
    "Added",
    "Changed",
    "Conflicting",
    "ConflictingStageState",
    "Ignored",
    "Missing",
    "Modified",
    "Removed",
    "Untracked",
    "UntrackedFolders",
    "Branches",
    "Remotes",
    "TrackingBranch",
    "RemoteTracking",
    "Ahead",
    "Behind",
];

/// Separator between items of a list-valued field.
const ITEM_DELIMITER: &str = "\n";

const NOT_FOUND_MESSAGE: &str = "Repository not found";

/// One compared branch pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairDivergence {
    pub local: RefName,
    pub remote: RefName,
    pub divergence: Divergence,
}

impl PairDivergence {
    /// `"<local> <remote>"`, as used in the `RemoteTracking` column.
    pub fn label(&self) -> String {
        format!("{} {}", self.local, self.remote)
    }
}

/// Everything gathered from an open repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDetails {
    pub status: WorktreeStatus,
    pub local_branches: Vec<BranchRef>,
    pub remote_branches: Vec<BranchRef>,
    pub remotes: Vec<RemoteInfo>,
    /// Upstream of the checked-out branch.
    pub tracking_branch: Option<RefName>,
    /// Every `(local, remote)` pair, locals outermost.
    pub pairs: Vec<PairDivergence>,
}

impl RepositoryDetails {
    fn branches(&self) -> impl Iterator<Item = &BranchRef> {
        self.local_branches.iter().chain(&self.remote_branches)
    }

    fn tracking_label(&self) -> &str {
        self.tracking_branch.as_ref().map_or("None", RefName::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportBody {
    NotFound,
    /// The repository opened but could not be read.
    Failed(String),
    Found(RepositoryDetails),
}

/// The report for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReport {
    pub path: String,
    pub body: ReportBody,
}

impl RepositoryReport {
    /// Gather the report for `handle`. Failures become part of the report.
    pub fn collect<B: Backend>(backend: &B, handle: &RepositoryHandle) -> Self {
        let body = match handle.open(backend) {
            Err(GitError::NotARepo { .. }) => ReportBody::NotFound,
            Err(e) => {
                warn!(path = %handle, error = %e, "cannot open repository");
                ReportBody::Failed(e.to_string())
            }
            Ok(repo) => match collect_details(&repo) {
                Ok(details) => ReportBody::Found(details),
                Err(e) => {
                    warn!(path = %handle, error = %e, "cannot read repository");
                    ReportBody::Failed(e.to_string())
                }
            },
        };
        Self {
            path: handle.path().to_string(),
            body,
        }
    }

    /// One CSV record, without the trailing newline.
    pub fn csv_row(&self) -> String {
        let mut fields = vec![csv_field(&self.path)];
        match &self.body {
            ReportBody::NotFound => fields.push(csv_field(NOT_FOUND_MESSAGE)),
            ReportBody::Failed(message) => fields.push(csv_field(message)),
            ReportBody::Found(details) => {
                let s = &details.status;
                fields.push(details.status.is_clean().to_string());
                fields.extend(
                    [
                        s.added,
                        s.changed,
                        s.conflicting,
                        s.conflicting_stage_state,
                        s.ignored,
                        s.missing,
                        s.modified,
                        s.removed,
                        s.untracked,
                        s.untracked_folders,
                    ]
                    .iter()
                    .map(usize::to_string),
                );
                fields.push(csv_list(details.branches().map(|b| b.name().to_string())));
                fields.push(csv_list(details.remotes.iter().filter_map(|r| {
                    r.url.as_ref().map(|url| format!("{} {}", r.name, url))
                })));
                fields.push(csv_field(details.tracking_label()));
                fields.push(csv_list(details.pairs.iter().map(PairDivergence::label)));
                fields.push(csv_list(
                    details.pairs.iter().map(|p| p.divergence.pair().0.to_string()),
                ));
                fields.push(csv_list(
                    details.pairs.iter().map(|p| p.divergence.pair().1.to_string()),
                ));
            }
        }
        // Short records are padded so every row has the same width.
        fields.resize(CSV_HEADINGS.len(), String::new());
        fields.join(",")
    }

    /// Human-readable status block.
    ///
    /// Change categories are listed only when the tree is dirty unless
    /// `full` is set; `full` also adds branches, remotes and the upstream
    /// of the checked-out branch.
    pub fn render_text(&self, full: bool) -> String {
        let mut out = format!("{},\n", self.path);
        let details = match &self.body {
            ReportBody::NotFound => {
                out.push_str(NOT_FOUND_MESSAGE);
                out.push('\n');
                return out;
            }
            ReportBody::Failed(message) => {
                let _ = writeln!(out, "Error getting status: {message}");
                return out;
            }
            ReportBody::Found(details) => details,
        };

        let s = &details.status;
        let clean = s.is_clean();
        let _ = writeln!(out, "Clean: {clean}");
        if full || !clean {
            for (label, count) in [
                ("Added", s.added),
                ("Changed", s.changed),
                ("Conflicting", s.conflicting),
                ("ConflictingStageState", s.conflicting_stage_state),
                ("Ignored", s.ignored),
                ("Missing", s.missing),
                ("Modified", s.modified),
                ("Removed", s.removed),
                ("Untracked", s.untracked),
                ("UntrackedFolders", s.untracked_folders),
            ] {
                let _ = writeln!(out, "{label}: {count}");
            }
        }

        if full {
            out.push_str("Branches\n");
            for branch in details.branches() {
                let _ = writeln!(out, "  {branch}");
            }
            out.push_str("Remotes\n");
            if details.remotes.is_empty() {
                out.push_str("  None\n");
            }
            for remote in &details.remotes {
                let url = remote.url.as_deref().unwrap_or("None");
                let _ = writeln!(out, "  {} ({url})", remote.name);
            }
        }

        out.push_str("Tracking\n");
        if full {
            let _ = writeln!(out, "  Tracking Branch: {}", details.tracking_label());
        }
        if details.local_branches.is_empty() {
            out.push_str("  No local branches\n");
        } else if details.remote_branches.is_empty() {
            out.push_str("  No remote branches\n");
        } else {
            for pair in &details.pairs {
                let _ = writeln!(out, "  For {} and {}", pair.local, pair.remote);
                match pair.divergence {
                    Divergence::NotComputable => out.push_str("    Not found\n"),
                    counts => {
                        let _ = writeln!(out, "    {counts}");
                    }
                }
            }
        }
        out
    }
}

fn collect_details<R: BackendRepo>(repo: &R) -> Result<RepositoryDetails, GitError> {
    let status = repo.worktree_status()?;
    let local_branches = repo.local_branches()?;
    let remote_branches = repo.remote_tracking_branches()?;
    let remotes = repo.remotes()?;
    let tracking_branch = match repo.current_branch()? {
        Some(current) => repo.tracking_branch_for(&current)?,
        None => None,
    };

    let mut calculator = DivergenceCalculator::new(repo);
    let mut pairs = Vec::with_capacity(local_branches.len() * remote_branches.len());
    for local in &local_branches {
        for remote in &remote_branches {
            pairs.push(PairDivergence {
                local: local.name().clone(),
                remote: remote.name().clone(),
                divergence: calculator.calculate(local, remote),
            });
        }
    }

    Ok(RepositoryDetails {
        status,
        local_branches,
        remote_branches,
        remotes,
        tracking_branch,
        pairs,
    })
}

/// Collect reports for every handle, in order.
pub fn collect_all<B: Backend>(backend: &B, handles: &[RepositoryHandle]) -> Vec<RepositoryReport> {
    handles
        .iter()
        .map(|handle| RepositoryReport::collect(backend, handle))
        .collect()
}

/// Write the header and one row per report.
pub fn write_csv<W: io::Write>(mut out: W, reports: &[RepositoryReport]) -> io::Result<()> {
    writeln!(out, "{}", CSV_HEADINGS.join(","))?;
    for report in reports {
        writeln!(out, "{}", report.csv_row())?;
    }
    out.flush()
}

/// Quote a scalar field only when it needs it.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quote(value)
    } else {
        value.to_string()
    }
}

/// List-valued fields are always quoted, items one per line.
fn csv_list<I: IntoIterator<Item = String>>(items: I) -> String {
    quote(&items.into_iter().collect::<Vec<_>>().join(ITEM_DELIMITER))
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::{FailOn, MockBackend, MockRepo};

    fn diverged() -> MockRepo {
        let mut repo = MockRepo::new();
        let root = repo.commit(&[]);
        let ours = repo.chain(&root, 2);
        let theirs = repo.chain(&root, 1);
        repo.local("main", &ours)
            .remote("origin/main", &theirs)
            .track("main", "origin/main")
            .checkout("main");
        repo
    }

    fn report_for(repo: MockRepo) -> RepositoryReport {
        let backend = MockBackend::new().with_repo("/w/a", repo);
        RepositoryReport::collect(&backend, &RepositoryHandle::new("/w/a"))
    }

    mod collect {
        use super::*;

        #[test]
        fn gathers_pairs_and_upstream() {
            let report = report_for(diverged());
            let ReportBody::Found(details) = &report.body else {
                panic!("expected details, got {:?}", report.body);
            };
            assert_eq!(details.pairs.len(), 1);
            assert_eq!(details.pairs[0].divergence, Divergence::counts(2, 1));
            assert_eq!(
                details.tracking_branch.as_ref().map(RefName::as_str),
                Some("refs/remotes/origin/main")
            );
            assert_eq!(details.remotes.len(), 1);
        }

        #[test]
        fn detached_head_has_no_upstream() {
            let mut repo = MockRepo::new();
            let root = repo.commit(&[]);
            repo.local("main", &root).track("main", "origin/main");
            let report = report_for(repo);
            let ReportBody::Found(details) = &report.body else {
                panic!("expected details");
            };
            assert_eq!(details.tracking_branch, None);
            assert!(details.pairs.is_empty());
        }

        #[test]
        fn not_found_and_failed() {
            let backend = MockBackend::new();
            let report = RepositoryReport::collect(&backend, &RepositoryHandle::new("/w/gone"));
            assert_eq!(report.body, ReportBody::NotFound);

            let mut repo = diverged();
            repo.fail_on(FailOn::RemoteBranches);
            assert!(matches!(report_for(repo).body, ReportBody::Failed(_)));
        }
    }

    mod csv {
        use super::*;

        #[test]
        fn header_order() {
            let mut buf = Vec::new();
            write_csv(&mut buf, &[]).unwrap();
            assert_eq!(
                String::from_utf8(buf).unwrap(),
                "Name,Clean,Added,Changed,Conflicting,ConflictingStageState,Ignored,\
                 Missing,Modified,Removed,Untracked,UntrackedFolders,Branches,Remotes,\
                 TrackingBranch,RemoteTracking,Ahead,Behind\n"
            );
        }

        #[test]
        fn found_row() {
            let row = report_for(diverged()).csv_row();
            assert_eq!(
                row,
                "/w/a,true,0,0,0,0,0,0,0,0,0,0,\
                 \"refs/heads/main\nrefs/remotes/origin/main\",\
                 \"origin https://example.com/origin.git\",\
                 refs/remotes/origin/main,\
                 \"refs/heads/main refs/remotes/origin/main\",\"2\",\"1\""
            );
        }

        #[test]
        fn sentinel_printed_as_minus_one() {
            let mut repo = MockRepo::new();
            let root = repo.commit(&[]);
            repo.local_unresolved("broken").remote("origin/main", &root);
            let row = report_for(repo).csv_row();
            assert!(row.ends_with(",\"-1\",\"-1\""), "{row}");
        }

        #[test]
        fn not_found_row_is_padded() {
            let report = RepositoryReport {
                path: "/w/gone".into(),
                body: ReportBody::NotFound,
            };
            let row = report.csv_row();
            assert!(row.starts_with("/w/gone,Repository not found,"));
            assert_eq!(row.matches(',').count(), CSV_HEADINGS.len() - 1);
        }

        #[test]
        fn scalar_quoting() {
            assert_eq!(csv_field("plain"), "plain");
            assert_eq!(csv_field("a,b"), "\"a,b\"");
            assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        }
    }

    mod text {
        use super::*;

        #[test]
        fn clean_summary_skips_categories() {
            let text = report_for(diverged()).render_text(false);
            assert!(text.starts_with("/w/a,\nClean: true\nTracking\n"));
            assert!(!text.contains("Added:"));
            assert!(text.contains(
                "  For refs/heads/main and refs/remotes/origin/main\n    Commits ahead : 2 Commits behind : 1\n"
            ));
        }

        #[test]
        fn full_lists_everything() {
            let text = report_for(diverged()).render_text(true);
            assert!(text.contains("Added: 0\n"));
            assert!(text.contains("Branches\n  refs/heads/main\n  refs/remotes/origin/main\n"));
            assert!(text.contains("Remotes\n  origin (https://example.com/origin.git)\n"));
            assert!(text.contains("  Tracking Branch: refs/remotes/origin/main\n"));
        }

        #[test]
        fn dirty_lists_categories() {
            let mut repo = diverged();
            repo.set_status(WorktreeStatus {
                modified: 3,
                ..Default::default()
            });
            let text = report_for(repo).render_text(false);
            assert!(text.contains("Clean: false\n"));
            assert!(text.contains("Modified: 3\n"));
        }

        #[test]
        fn branch_edge_cases() {
            let mut no_remote = MockRepo::new();
            let root = no_remote.commit(&[]);
            no_remote.local("main", &root);
            assert!(report_for(no_remote)
                .render_text(false)
                .contains("  No remote branches\n"));

            assert!(report_for(MockRepo::new())
                .render_text(false)
                .contains("  No local branches\n"));
        }

        #[test]
        fn not_found() {
            let report = RepositoryReport {
                path: "/w/gone".into(),
                body: ReportBody::NotFound,
            };
            assert_eq!(report.render_text(true), "/w/gone,\nRepository not found\n");
        }
    }
}
