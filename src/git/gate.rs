//! Validated status/commit/push sequence over a [`GitClient`].

use crate::error::{Result, ValidationError};
use crate::git::{GitClient, GitStatus, RemoteDescriptor};
use crate::prompt::Prompter;
use log::debug;
use semver::Version;
use std::path::PathBuf;

/// Wraps version-control status, staging, commit and push as a gated sequence.
///
/// Each step assumes the previous one succeeded; the orchestrator aborts the
/// release on the first failure.
pub struct RepositoryGate<'a, G> {
    git: &'a G,
}

impl<'a, G: GitClient> RepositoryGate<'a, G> {
    /// Create a gate over a git client
    pub fn new(git: &'a G) -> Self {
        Self { git }
    }

    /// Deterministic release commit message
    pub fn commit_message(version: &Version) -> String {
        format!("Release version {version}")
    }

    /// Step 1: require a clean working tree; returns the status snapshot
    pub async fn ensure_clean(&self) -> Result<GitStatus> {
        let status = self.git.status().await?;
        if !status.is_clean() {
            return Err(ValidationError::DirtyWorkingTree {
                paths: status.pending_paths(),
            }
            .into());
        }
        debug!("working tree clean on branch {}", status.current_branch);
        Ok(status)
    }

    /// Step 2: select the push remote, prompting only when several exist
    pub async fn select_remote<P: Prompter>(&self, prompter: &P) -> Result<RemoteDescriptor> {
        let remotes = self.git.remotes().await?;
        match remotes.len() {
            0 => Err(ValidationError::NoPushRemote.into()),
            1 => Ok(remotes.into_iter().next().expect("one remote")),
            _ => prompter.select_remote(&remotes).await,
        }
    }

    /// Step 3: stage the release files
    pub async fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        debug!("staging {} release file(s)", paths.len());
        self.git.add(paths).await
    }

    /// Step 4: commit with the release message template; returns the commit id
    pub async fn commit_release(&self, version: &Version) -> Result<String> {
        let commit = self.git.commit(&Self::commit_message(version)).await?;
        debug!("release commit {commit}");
        Ok(commit)
    }

    /// Step 5: push the release commit
    pub async fn push(&self, remote: &RemoteDescriptor, branch: &str) -> Result<()> {
        self.git.push(&remote.name, branch).await
    }
}
