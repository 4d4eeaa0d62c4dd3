//! Mutable state accumulated across one release run and its terminal results.

use crate::error::{PublicationError, ReleaseError};
use crate::git::RemoteDescriptor;
use crate::github::ReleaseRecord;
use crate::release::ReleasePhase;
use semver::Version;
use std::path::PathBuf;

/// State accumulated across one `run()` invocation.
///
/// Owned exclusively by the orchestrator for the duration of the run and
/// discarded at completion.
#[derive(Debug, Default)]
pub struct ReleaseContext {
    /// Current theme version read from configuration
    pub current_version: Option<Version>,
    /// Validated target version
    pub target_version: Option<Version>,
    /// Selected push remote
    pub remote: Option<RemoteDescriptor>,
    /// Branch the release commit is pushed to
    pub branch: Option<String>,
    /// Whether the user opted into remote release creation
    pub create_remote_release: bool,
    /// Whether a hosting token was supplied
    pub hosting_token: Option<String>,
    /// Path of the built bundle artifact
    pub bundle_path: Option<PathBuf>,
    /// Rendered changelog excerpt for the new version
    pub changelog_excerpt: Option<String>,
    /// Release commit identifier
    pub commit: Option<String>,
}

/// Terminal success payload of a completed release
#[derive(Debug, Clone)]
pub struct ReleaseSummary {
    /// Released version
    pub version: Version,
    /// Release commit identifier
    pub commit: String,
    /// Remote the commit was pushed to
    pub remote: RemoteDescriptor,
    /// Remote release record, when publication was requested
    pub record: Option<ReleaseRecord>,
}

/// Terminal outcome of a release run
#[derive(Debug)]
pub enum ReleaseOutcome {
    /// The release ran to completion
    Released(ReleaseSummary),
    /// The user declined the final confirmation; nothing was mutated
    Declined,
}

/// A release run that aborted, with enough context to tell the user what was
/// already mutated
#[derive(Debug)]
pub struct ReleaseFailure {
    /// Phase that was executing when the run aborted
    pub phase: ReleasePhase,
    /// The error that aborted the run
    pub error: ReleaseError,
}

impl ReleaseFailure {
    /// Whether a local release commit exists despite the abort.
    ///
    /// The commit is the last operation of the stage-and-commit phase, so any
    /// failure in a later phase leaves one behind.
    pub fn local_commit_exists(&self) -> bool {
        self.phase > ReleasePhase::StageAndCommit
    }

    /// Whether the remote carries a release entry without its asset
    pub fn release_missing_asset(&self) -> bool {
        matches!(
            self.error,
            ReleaseError::Publication(PublicationError::AssetUploadFailed { .. })
        )
    }
}

impl std::fmt::Display for ReleaseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "release aborted during {}: {}", self.phase, self.error)
    }
}

impl std::error::Error for ReleaseFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
