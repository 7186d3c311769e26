// Shared fixtures for integration tests: throwaway password stores backed by git.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

/// Committer timestamp used for every fixture commit (Tue Nov 14 22:13:20 2023 UTC).
pub const COMMIT_EPOCH: i64 = 1_700_000_000;
pub const COMMIT_ASCTIME: &str = "Tue Nov 14 22:13:20 2023";

/// Check if git is usable on this machine.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir`, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let date = format!("{COMMIT_EPOCH} +0000");
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args([
            "-c",
            "user.name=Fixture",
            "-c",
            "user.email=fixture@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .env("GIT_AUTHOR_DATE", &date)
        .env("GIT_COMMITTER_DATE", &date)
        .output()
        .expect("failed to run git");

    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Write a store entry; the fixture "ciphertext" is the plaintext itself.
pub fn write_entry(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Initialise `root` as a repository on `branch`, commit everything and
/// return the commit hash.
pub fn commit_store(root: &Path, branch: &str) -> String {
    git(root, &["init", "-q"]);
    git(root, &["symbolic-ref", "HEAD", &format!("refs/heads/{branch}")]);
    git(root, &["add", "-A"]);
    git(root, &["commit", "-q", "--allow-empty", "-m", "Initial store"]);
    git(root, &["rev-parse", "HEAD"])
}
