//! Command line interface for theme_release.
//!
//! Wires the concrete collaborators to the orchestrator and maps its terminal
//! state to an exit code: 0 for success or a user decline, 1 for any failure.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::bundle::ZipBundler;
use crate::error::Result;
use crate::fsutil::LocalFileStore;
use crate::git::SystemGit;
use crate::github::GitHubClient;
use crate::prompt::TerminalPrompter;
use crate::release::{ReleaseFailure, ReleaseOrchestrator, ReleaseOutcome};
use crate::store::StoreConfigManager;
use crate::theme::ThemeConfigManager;
use anyhow::Context;

/// Main CLI entry point; returns the process exit code
pub async fn run() -> Result<i32> {
    let _args = Args::parse_args();
    let output = OutputManager::default();

    let theme_root = std::env::current_dir().context("cannot determine current directory")?;

    let orchestrator = ReleaseOrchestrator::new(
        &theme_root,
        SystemGit::open(&theme_root),
        TerminalPrompter,
        ZipBundler::new(&theme_root),
        GitHubClient::new(),
        ThemeConfigManager::new(&theme_root),
        LocalFileStore,
        StoreConfigManager::new(&theme_root),
        output.clone(),
    );

    match orchestrator.run().await {
        Ok(ReleaseOutcome::Released(summary)) => {
            output.println("");
            output.success(&format!(
                "Released {} (commit {})",
                summary.version, summary.commit
            ));
            if let Some(record) = &summary.record {
                output.indent(&format!("Release: {}", record.html_url));
                if let Some(asset) = &record.asset_download_url {
                    output.indent(&format!("Bundle: {asset}"));
                }
            }
            Ok(0)
        }
        Ok(ReleaseOutcome::Declined) => Ok(0),
        Err(failure) => {
            report_failure(&output, &failure);
            Ok(1)
        }
    }
}

/// Tell the user what failed and whether local or remote state was mutated
fn report_failure(output: &OutputManager, failure: &ReleaseFailure) {
    output.error(&failure.to_string());

    if failure.local_commit_exists() {
        output.warn("The release commit exists locally; resolve the failure and push manually.");
    }
    if failure.release_missing_asset() {
        output.warn(
            "The release entry exists on the hosting service without its bundle. \
             The bundle file was kept in the theme directory; upload it manually \
             or delete the release and retry.",
        );
    }

    let suggestions = failure.error.recovery_suggestions();
    if !suggestions.is_empty() {
        output.println("\nRecovery suggestions:");
        for suggestion in suggestions {
            output.indent(&suggestion);
        }
    }
}
