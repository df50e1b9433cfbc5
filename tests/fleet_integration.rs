//! End-to-end tests for locate, classify, summarize and report against
//! real repositories.

mod common;

use std::path::Path;

use tempfile::TempDir;

use common::{commit_file, diverged_repo, init_repo, run_git, write_file};
use gitfleet::core::locations::{normalize_path, RepositoryLocationSet};
use gitfleet::fleet::report::ReportBody;
use gitfleet::fleet::{
    classify, resolve, summarize, write_csv, Divergence, RepositoryHandle, RepositoryReport,
    RepositoryStateFlags,
};
use gitfleet::git::Git2Backend;

fn path_str(path: &Path) -> String {
    normalize_path(&path.to_string_lossy())
}

fn handle(path: &Path) -> RepositoryHandle {
    RepositoryHandle::new(&path_str(path))
}

fn no_paths() -> Vec<String> {
    Vec::new()
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn tracked_branch_ahead_and_behind() {
    let dir = TempDir::new().unwrap();
    diverged_repo(dir.path());

    let flags = classify(&Git2Backend, &handle(dir.path()));
    assert!(flags.clean);
    assert!(flags.ahead);
    assert!(flags.behind);
    assert!(!flags.not_tracking);
    assert!(!flags.no_remote_branches);
}

#[test]
fn untracked_branch_is_non_tracking_ahead() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    let base = common::git_output(dir.path(), &["rev-parse", "HEAD"]);
    run_git(
        dir.path(),
        &["remote", "add", "origin", "https://example.invalid/origin.git"],
    );
    run_git(dir.path(), &["update-ref", "refs/remotes/origin/main", &base]);
    for n in 0..3 {
        commit_file(dir.path(), &format!("f{n}.txt"), "x\n", "local only");
    }

    let flags = classify(&Git2Backend, &handle(dir.path()));
    assert!(flags.non_tracking_ahead);
    assert!(!flags.non_tracking_behind);
    assert!(!flags.ahead);
    assert!(!flags.behind);
}

#[test]
fn no_remote_branches() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());

    let flags = classify(&Git2Backend, &handle(dir.path()));
    assert!(flags.no_remote_branches);
    assert!(!flags.ahead && !flags.behind);
    assert!(!flags.non_tracking_ahead && !flags.non_tracking_behind);
}

#[test]
fn plain_directory_is_not_found() {
    let dir = TempDir::new().unwrap();
    let flags = classify(&Git2Backend, &handle(dir.path()));
    assert_eq!(flags, RepositoryStateFlags::not_found());
}

#[test]
fn dirty_worktree_is_not_clean() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    write_file(dir.path(), "scratch.txt", "wip\n");

    let flags = classify(&Git2Backend, &handle(dir.path()));
    assert!(!flags.clean);
}

#[test]
fn empty_repository_has_no_branches() {
    let dir = TempDir::new().unwrap();
    run_git(dir.path(), &["init", "-q"]);

    let flags = classify(&Git2Backend, &handle(dir.path()));
    assert!(flags.clean);
    assert!(!flags.no_remote_branches);
    assert!(!flags.not_found);
}

// =============================================================================
// Location Resolution
// =============================================================================

#[test]
fn resolve_parents_individuals_and_exclusions() {
    let work = TempDir::new().unwrap();
    std::fs::create_dir_all(work.path().join("a/.git")).unwrap();
    std::fs::create_dir_all(work.path().join("b")).unwrap();
    let work_root = path_str(work.path());

    let set = RepositoryLocationSet::new(
        [work_root.clone()],
        ["/other/c"],
        [format!("{work_root}/a")],
    );
    let resolved: Vec<String> = resolve(&set)
        .iter()
        .map(|h| h.path().to_string())
        .collect();
    assert_eq!(resolved, vec!["/other/c"]);
}

// =============================================================================
// Summary and Reports
// =============================================================================

#[test]
fn summary_over_a_mixed_fleet() {
    let work = TempDir::new().unwrap();
    diverged_repo(&work.path().join("diverged"));
    init_repo(&work.path().join("lonely"));
    init_repo(&work.path().join("messy"));
    write_file(&work.path().join("messy"), "wip.txt", "?\n");

    let set = RepositoryLocationSet::new(
        [path_str(work.path())],
        [format!("{}/gone", path_str(work.path()))],
        no_paths(),
    );
    let handles = resolve(&set);
    assert_eq!(handles.len(), 4);

    let counts = summarize(&Git2Backend, &handles);
    assert_eq!(counts.total, 4);
    assert_eq!(counts.dirty, 2);
    assert_eq!(counts.ahead, 1);
    assert_eq!(counts.behind, 1);
    assert_eq!(counts.no_remote_branches, 2);
    assert_eq!(counts.not_found, 1);
    assert_eq!(counts.not_tracking, 0);
}

#[test]
fn report_for_diverged_repository() {
    let dir = TempDir::new().unwrap();
    diverged_repo(dir.path());

    let report = RepositoryReport::collect(&Git2Backend, &handle(dir.path()));
    let ReportBody::Found(details) = &report.body else {
        panic!("expected a readable repository, got {:?}", report.body);
    };
    assert_eq!(details.pairs.len(), 1);
    assert_eq!(details.pairs[0].divergence, Divergence::counts(2, 1));
    assert_eq!(
        details.tracking_branch.as_ref().map(|r| r.as_str()),
        Some("refs/remotes/origin/main")
    );

    let text = report.render_text(true);
    assert!(text.contains("Commits ahead : 2 Commits behind : 1"));
    assert!(text.contains("origin (https://example.invalid/origin.git)"));

    let mut csv = Vec::new();
    write_csv(&mut csv, &[report]).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    assert!(csv.starts_with("Name,Clean,"));
    assert!(csv.contains("\"origin https://example.invalid/origin.git\""));
    assert!(csv.trim_end().ends_with("\"2\",\"1\""));
}
