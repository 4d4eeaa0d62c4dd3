//! Git client trait and the system-git subprocess backend.
//!
//! Uses git plumbing/porcelain commands through `tokio::process` so no libgit
//! bindings are required. One subprocess per operation; output is parsed from
//! the stable `--porcelain=v2` formats.

use crate::error::{RepositoryError, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Snapshot of the working-tree state consumed by the release gate
#[derive(Debug, Clone, Default)]
pub struct GitStatus {
    /// Untracked paths
    pub not_added: Vec<String>,
    /// Newly staged paths
    pub created: Vec<String>,
    /// Modified paths (staged or unstaged)
    pub modified: Vec<String>,
    /// Deleted paths
    pub deleted: Vec<String>,
    /// Renamed paths
    pub renamed: Vec<String>,
    /// Paths with merge conflicts
    pub conflicted: Vec<String>,
    /// Current branch name
    pub current_branch: String,
    /// Commits ahead of upstream
    pub ahead: u32,
    /// Commits behind upstream
    pub behind: u32,
}

impl GitStatus {
    /// A release may only proceed from a clean working tree
    pub fn is_clean(&self) -> bool {
        self.not_added.is_empty()
            && self.created.is_empty()
            && self.modified.is_empty()
            && self.deleted.is_empty()
            && self.renamed.is_empty()
            && self.conflicted.is_empty()
    }

    /// All paths with pending changes, for error reporting
    pub fn pending_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        paths.extend(self.not_added.iter().cloned());
        paths.extend(self.created.iter().cloned());
        paths.extend(self.modified.iter().cloned());
        paths.extend(self.deleted.iter().cloned());
        paths.extend(self.renamed.iter().cloned());
        paths.extend(self.conflicted.iter().cloned());
        paths
    }
}

/// Name and push URL of a configured remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDescriptor {
    /// Remote name (e.g. `origin`)
    pub name: String,
    /// Push URL
    pub push_url: String,
}

/// Trait defining the git operations the release flow needs
pub trait GitClient {
    /// Working-tree status snapshot
    fn status(&self) -> impl Future<Output = Result<GitStatus>> + Send;

    /// Configured remotes with their push URLs
    fn remotes(&self) -> impl Future<Output = Result<Vec<RemoteDescriptor>>> + Send;

    /// Stage the given paths
    fn add(&self, paths: &[PathBuf]) -> impl Future<Output = Result<()>> + Send;

    /// Create a commit; returns the new commit id
    fn commit(&self, message: &str) -> impl Future<Output = Result<String>> + Send;

    /// Push the current branch to a remote
    fn push(&self, remote: &str, branch: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Git backend using the system git binary
#[derive(Debug, Clone)]
pub struct SystemGit {
    work_tree: PathBuf,
}

impl SystemGit {
    /// Open the repository containing `path`
    pub fn open(path: &Path) -> Self {
        Self {
            work_tree: path.to_path_buf(),
        }
    }

    fn git_cmd(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.work_tree);
        cmd
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = self
            .git_cmd()
            .args(args)
            .output()
            .await
            .map_err(|e| RepositoryError::CommandFailed {
                command: args.join(" "),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RepositoryError::CommandFailed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GitClient for SystemGit {
    async fn status(&self) -> Result<GitStatus> {
        let stdout = self.run(&["status", "--porcelain=v2", "--branch"]).await?;
        parse_porcelain_status(&stdout)
    }

    async fn remotes(&self) -> Result<Vec<RemoteDescriptor>> {
        let stdout = self.run(&["remote", "-v"]).await?;
        Ok(parse_remotes(&stdout))
    }

    async fn add(&self, paths: &[PathBuf]) -> Result<()> {
        let mut args: Vec<String> = vec!["add".to_string(), "--".to_string()];
        args.extend(paths.iter().map(|p| p.display().to_string()));
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&arg_refs).await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<String> {
        let output = self
            .git_cmd()
            .args(["commit", "-m", message])
            .output()
            .await
            .map_err(|e| RepositoryError::CommitFailed {
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RepositoryError::CommitFailed {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let hash = self.run(&["rev-parse", "HEAD"]).await?;
        Ok(hash.trim().to_string())
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        let output = self
            .git_cmd()
            .args(["push", remote, branch])
            .output()
            .await
            .map_err(|e| RepositoryError::PushRejected {
                remote: remote.to_string(),
                branch: branch.to_string(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RepositoryError::PushRejected {
                remote: remote.to_string(),
                branch: branch.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Parse `git status --porcelain=v2 --branch` output
fn parse_porcelain_status(stdout: &str) -> Result<GitStatus> {
    let mut status = GitStatus {
        current_branch: "HEAD".to_string(),
        ..Default::default()
    };

    for line in stdout.lines() {
        if let Some(header) = line.strip_prefix("# ") {
            if let Some(head) = header.strip_prefix("branch.head ") {
                status.current_branch = head.trim().to_string();
            } else if let Some(ab) = header.strip_prefix("branch.ab ") {
                for part in ab.split_whitespace() {
                    if let Some(n) = part.strip_prefix('+') {
                        status.ahead = n.parse().unwrap_or(0);
                    } else if let Some(n) = part.strip_prefix('-') {
                        status.behind = n.parse().unwrap_or(0);
                    }
                }
            }
            continue;
        }

        let mut fields = line.split(' ');
        match fields.next() {
            Some("1") => {
                let xy = fields.next().unwrap_or("");
                let path = line
                    .splitn(9, ' ')
                    .nth(8)
                    .ok_or_else(|| RepositoryError::ParseFailed {
                        command: "status".to_string(),
                        reason: format!("short changed entry: {line:?}"),
                    })?;
                classify_change(xy, path, &mut status);
            }
            Some("2") => {
                // Rename entries carry "<path>\t<origPath>" in the last field.
                let tail = line
                    .splitn(10, ' ')
                    .nth(9)
                    .ok_or_else(|| RepositoryError::ParseFailed {
                        command: "status".to_string(),
                        reason: format!("short rename entry: {line:?}"),
                    })?;
                let path = tail.split('\t').next().unwrap_or(tail);
                status.renamed.push(path.to_string());
            }
            Some("u") => {
                let path = line
                    .splitn(11, ' ')
                    .nth(10)
                    .ok_or_else(|| RepositoryError::ParseFailed {
                        command: "status".to_string(),
                        reason: format!("short unmerged entry: {line:?}"),
                    })?;
                status.conflicted.push(path.to_string());
            }
            Some("?") => {
                if let Some(path) = line.strip_prefix("? ") {
                    status.not_added.push(path.to_string());
                }
            }
            _ => {}
        }
    }

    Ok(status)
}

fn classify_change(xy: &str, path: &str, status: &mut GitStatus) {
    if xy.contains('A') {
        status.created.push(path.to_string());
    } else if xy.contains('D') {
        status.deleted.push(path.to_string());
    } else if xy.contains('R') {
        status.renamed.push(path.to_string());
    } else {
        status.modified.push(path.to_string());
    }
}

/// Parse `git remote -v` output into push-URL descriptors
fn parse_remotes(stdout: &str) -> Vec<RemoteDescriptor> {
    let mut remotes = Vec::new();
    for line in stdout.lines() {
        let Some(rest) = line.strip_suffix(" (push)") else {
            continue;
        };
        let mut parts = rest.split_whitespace();
        let (Some(name), Some(url)) = (parts.next(), parts.next()) else {
            continue;
        };
        remotes.push(RemoteDescriptor {
            name: name.to_string(),
            push_url: url.to_string(),
        });
    }
    remotes
}
