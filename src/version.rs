//! Version stamp taken from the store's git history.

use crate::error::{ExportError, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Tip commit of a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit hash
    pub sha: String,
    /// Committer timestamp
    pub committed: DateTime<Utc>,
}

/// Source of commit metadata for a store.
pub trait CommitSource {
    fn branch_tip(&self, root: &Path, branch: &str) -> Result<CommitInfo>;
}

/// Reads commit metadata by running the `git` command.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl CommitSource for GitCli {
    fn branch_tip(&self, root: &Path, branch: &str) -> Result<CommitInfo> {
        let unavailable = |reason: String| ExportError::VersionInfoUnavailable {
            path: root.to_path_buf(),
            reason,
        };

        let reference = format!("refs/heads/{branch}");
        let mut cmd = Command::new(&self.program);
        cmd.arg("-C")
            .arg(root)
            .args(["log", "-1", "--no-show-signature", "--format=%H%n%ct"])
            .args([reference.as_str(), "--"])
            .env_remove("GIT_DIR")
            .env_remove("GIT_WORK_TREE")
            .stdin(Stdio::null());

        // Only the store itself may be the repository, never a parent of it
        if let Some(parent) = root.parent() {
            cmd.env("GIT_CEILING_DIRECTORIES", parent);
        }

        let output = cmd
            .output()
            .map_err(|e| unavailable(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(unavailable(format!(
                "cannot read branch '{branch}': {}",
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let commit = parse_log_output(&stdout)
            .ok_or_else(|| unavailable(format!("unexpected git output: {}", stdout.trim())))?;

        debug!(sha = %commit.sha, branch, "resolved branch tip");
        Ok(commit)
    }
}

/// Parse `%H%n%ct` output.
fn parse_log_output(output: &str) -> Option<CommitInfo> {
    let mut lines = output.lines();
    let sha = lines.next()?.trim();
    let seconds: i64 = lines.next()?.trim().parse().ok()?;

    if sha.is_empty() {
        return None;
    }

    Some(CommitInfo {
        sha: sha.to_string(),
        committed: DateTime::from_timestamp(seconds, 0)?,
    })
}

/// Header block identifying the store's history at export time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStamp {
    commit: CommitInfo,
}

impl VersionStamp {
    pub fn new(commit: CommitInfo) -> Self {
        Self { commit }
    }

    /// Read the stamp for `branch` of the repository at `root`.
    pub fn read(source: &impl CommitSource, root: &Path, branch: &str) -> Result<Self> {
        source.branch_tip(root, branch).map(Self::new)
    }

    pub fn commit(&self) -> &CommitInfo {
        &self.commit
    }
}

/// `asctime` layout, e.g. `Mon Jan  5 09:03:00 2026`.
pub fn asctime(time: &DateTime<Utc>) -> String {
    time.format("%a %b %e %H:%M:%S %Y").to_string()
}

impl fmt::Display for VersionStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "commit sha: {}\nlast commit: {}\n\n",
            self.commit.sha,
            asctime(&self.commit.committed)
        )
    }
}
