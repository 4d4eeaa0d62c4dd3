//! Interactive prompt collaborator.
//!
//! The orchestrator asks a fixed sequence of questions: target version, remote
//! selection (only when ambiguous), create-release opt-in, hosting token, and
//! the final confirmation. [`TerminalPrompter`] answers them from stdin.

use crate::error::Result;
use crate::git::RemoteDescriptor;
use anyhow::Context;
use semver::Version;
use std::future::Future;
use std::io::Write;

/// Trait for the interactive question sequence
pub trait Prompter {
    /// Ask for the target version to release
    fn target_version(&self, current: &Version) -> impl Future<Output = Result<String>> + Send;

    /// Choose one remote among several configured ones
    fn select_remote(
        &self,
        remotes: &[RemoteDescriptor],
    ) -> impl Future<Output = Result<RemoteDescriptor>> + Send;

    /// Whether a remote release entry should be created
    fn create_remote_release(&self) -> impl Future<Output = Result<bool>> + Send;

    /// Hosting API token for release creation
    fn hosting_token(&self) -> impl Future<Output = Result<String>> + Send;

    /// Final confirmation before any irreversible action
    fn confirm_release(
        &self,
        target: &Version,
        remote: &RemoteDescriptor,
    ) -> impl Future<Output = Result<bool>> + Send;
}

/// Prompter reading answers from the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line(question: &str) -> Result<String> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{question} ").context("failed to write prompt")?;
        stdout.flush().context("failed to flush prompt")?;

        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .context("failed to read answer from stdin")?;
        Ok(answer.trim().to_string())
    }

    fn read_yes_no(question: &str, default_yes: bool) -> Result<bool> {
        let suffix = if default_yes { "[Y/n]" } else { "[y/N]" };
        let answer = Self::read_line(&format!("{question} {suffix}"))?;
        Ok(match answer.to_ascii_lowercase().as_str() {
            "" => default_yes,
            "y" | "yes" => true,
            _ => false,
        })
    }
}

impl Prompter for TerminalPrompter {
    async fn target_version(&self, current: &Version) -> Result<String> {
        Self::read_line(&format!("Version to release (current {current}):"))
    }

    async fn select_remote(&self, remotes: &[RemoteDescriptor]) -> Result<RemoteDescriptor> {
        println!("Multiple push remotes are configured:");
        for (idx, remote) in remotes.iter().enumerate() {
            println!("  {}) {} ({})", idx + 1, remote.name, remote.push_url);
        }

        loop {
            let answer = Self::read_line("Remote to push the release to (number):")?;
            if let Ok(choice) = answer.parse::<usize>()
                && choice >= 1
                && choice <= remotes.len()
            {
                return Ok(remotes[choice - 1].clone());
            }
            println!("Enter a number between 1 and {}.", remotes.len());
        }
    }

    async fn create_remote_release(&self) -> Result<bool> {
        Self::read_yes_no("Create a GitHub release with the bundle attached?", true)
    }

    async fn hosting_token(&self) -> Result<String> {
        Self::read_line("GitHub token (repo scope):")
    }

    async fn confirm_release(
        &self,
        target: &Version,
        remote: &RemoteDescriptor,
    ) -> Result<bool> {
        Self::read_yes_no(
            &format!(
                "Release version {target} and push to '{}' ({})?",
                remote.name, remote.push_url
            ),
            false,
        )
    }
}
