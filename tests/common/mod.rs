//! Shared fixtures for integration tests.
//!
//! Repositories are built with the `git` executable so the library is
//! checked against what git itself writes.

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use gitfleet::git::Git;

/// Test fixture that creates a real git repository with one commit on
/// `main`.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        init_repo(dir.path());
        Self { dir }
    }

    /// Get the path to the repository.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open a Git interface to this repository.
    pub fn git(&self) -> Git {
        Git::open(self.path()).expect("failed to open test repo")
    }

    /// Write a file relative to the repository root, creating directories.
    pub fn write(&self, path: &str, content: &str) {
        write_file(self.path(), path, content);
    }

    /// Create a file and commit it, returning the new HEAD.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> String {
        commit_file(self.path(), path, content, message)
    }

    /// Commit `file` on a throwaway branch forked from HEAD and return the
    /// commit id. HEAD and the working tree are left where they were.
    pub fn commit_on_side(&self, file: &str) -> String {
        let current = git_output(self.path(), &["symbolic-ref", "--short", "HEAD"]);
        run_git(self.path(), &["checkout", "-q", "-b", "side-work"]);
        let oid = self.commit_file(file, "side\n", "side commit");
        run_git(self.path(), &["checkout", "-q", &current]);
        run_git(self.path(), &["branch", "-q", "-D", "side-work"]);
        oid
    }

    /// Get HEAD OID using git directly.
    pub fn head(&self) -> String {
        git_output(self.path(), &["rev-parse", "HEAD"])
    }

    /// Register a remote with a placeholder URL; nothing is fetched.
    pub fn add_remote(&self, name: &str) {
        run_git(
            self.path(),
            &["remote", "add", name, &format!("https://example.invalid/{name}.git")],
        );
    }

    /// Point `refs/remotes/<name>` at `oid`.
    pub fn set_remote_ref(&self, name: &str, oid: &str) {
        run_git(
            self.path(),
            &["update-ref", &format!("refs/remotes/{name}"), oid],
        );
    }

    /// Configure `local` to track `<remote>/<branch>`.
    pub fn track(&self, local: &str, remote: &str, branch: &str) {
        run_git(
            self.path(),
            &["config", &format!("branch.{local}.remote"), remote],
        );
        run_git(
            self.path(),
            &[
                "config",
                &format!("branch.{local}.merge"),
                &format!("refs/heads/{branch}"),
            ],
        );
    }
}

/// Initialise `dir` as a repository with an initial commit on `main`.
pub fn init_repo(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    run_git(dir, &["init", "-q"]);
    run_git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    run_git(dir, &["config", "user.email", "test@example.com"]);
    run_git(dir, &["config", "user.name", "Test User"]);
    run_git(dir, &["config", "commit.gpgsign", "false"]);
    commit_file(dir, "README.md", "# Test Repo\n", "Initial commit");
}

pub fn write_file(dir: &Path, path: &str, content: &str) {
    let full = dir.join(path);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(full, content).unwrap();
}

pub fn commit_file(dir: &Path, path: &str, content: &str, message: &str) -> String {
    write_file(dir, path, content);
    run_git(dir, &["add", path]);
    run_git(dir, &["commit", "-q", "-m", message]);
    git_output(dir, &["rev-parse", "HEAD"])
}

/// Run a git command in the given directory.
pub fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Run a git command and return its trimmed stdout.
pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

/// Build the two-ahead, one-behind layout: `main` has two commits that
/// `origin/main` lacks and `origin/main` has one that `main` lacks.
pub fn diverged_repo(dir: &Path) {
    init_repo(dir);
    run_git(
        dir,
        &["remote", "add", "origin", "https://example.invalid/origin.git"],
    );
    run_git(dir, &["checkout", "-q", "-b", "upstream-work"]);
    let theirs = commit_file(dir, "theirs.txt", "1\n", "remote work");
    run_git(dir, &["checkout", "-q", "main"]);
    run_git(dir, &["branch", "-q", "-D", "upstream-work"]);
    run_git(dir, &["update-ref", "refs/remotes/origin/main", &theirs]);
    run_git(dir, &["config", "branch.main.remote", "origin"]);
    run_git(dir, &["config", "branch.main.merge", "refs/heads/main"]);
    commit_file(dir, "a.txt", "a\n", "local work 1");
    commit_file(dir, "b.txt", "b\n", "local work 2");
}
