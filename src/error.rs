//! Error types for theme release operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for theme release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all theme release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Pre-mutation validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Git operation errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Remote release publication errors
    #[error("Publication error: {0}")]
    Publication(#[from] PublicationError),

    /// Bundle creation errors
    #[error("Bundle error: {0}")]
    Bundle(String),

    /// IO error with the file path that failed
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path that was being read or written
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors from the hosting API client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Validation failures surfaced before any mutation is performed
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Runtime or tooling requirements are not met
    #[error("Unsupported environment: {reason}")]
    UnsupportedEnvironment {
        /// Reason for the error
        reason: String,
    },

    /// The working tree has uncommitted changes
    #[error("Working tree not clean: {} pending change(s). Commit or stash before releasing.", paths.len())]
    DirtyWorkingTree {
        /// Paths with pending changes
        paths: Vec<String>,
    },

    /// No remote with a push URL is configured
    #[error("No push remote configured. Add one with 'git remote add'.")]
    NoPushRemote,

    /// The candidate version string does not parse as a semantic version
    #[error("Invalid version '{candidate}': {source}")]
    InvalidVersionFormat {
        /// Candidate version string
        candidate: String,
        /// Parsing error
        #[source]
        source: semver::Error,
    },

    /// The candidate version is not strictly greater than the current version
    #[error("Version '{candidate}' does not advance the current version '{current}'")]
    VersionNotAdvancing {
        /// Current version
        current: semver::Version,
        /// Candidate version
        candidate: semver::Version,
    },

    /// The changelog already carries a section for the target version
    #[error("Changelog already contains a section for version '{version}'")]
    DuplicateChangelogEntry {
        /// Version with an existing section
        version: semver::Version,
    },
}

/// Git operation errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A git subprocess could not be spawned or exited non-zero
    #[error("git {command} failed: {stderr}")]
    CommandFailed {
        /// Subcommand that failed
        command: String,
        /// Captured stderr
        stderr: String,
    },

    /// Commit creation failed
    #[error("git commit failed: {reason}")]
    CommitFailed {
        /// Reason for the error
        reason: String,
    },

    /// The push was rejected; a local release commit already exists
    #[error(
        "git push to '{remote}' ({branch}) was rejected: {stderr}. \
         The release commit exists locally; pull/rebase and push manually."
    )]
    PushRejected {
        /// Remote name
        remote: String,
        /// Branch name
        branch: String,
        /// Captured stderr
        stderr: String,
    },

    /// Output from git could not be parsed
    #[error("Failed to parse git output for {command}: {reason}")]
    ParseFailed {
        /// Subcommand whose output was unreadable
        command: String,
        /// Reason for the error
        reason: String,
    },
}

/// Remote release publication errors
#[derive(Error, Debug)]
pub enum PublicationError {
    /// The hosting service refused to create the release
    #[error("Release creation failed ({status}): {body}")]
    ReleaseCreationFailed {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The bundle artifact could not be attached to the release
    #[error("Asset upload failed ({status}): {body}")]
    AssetUploadFailed {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The remote push URL does not identify a hosted repository
    #[error("Cannot determine repository identity from remote URL '{url}'")]
    UnrecognizedRemoteUrl {
        /// Remote push URL
        url: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Validation(ValidationError::DirtyWorkingTree { .. }) => vec![
                "Commit pending changes: git add . && git commit -m 'message'".to_string(),
                "Stash changes temporarily: git stash".to_string(),
            ],
            ReleaseError::Validation(ValidationError::NoPushRemote) => vec![
                "Add a remote: git remote add origin <url>".to_string(),
                "Verify remotes: git remote -v".to_string(),
            ],
            ReleaseError::Validation(ValidationError::UnsupportedEnvironment { .. }) => vec![
                "Ensure git is installed and on PATH".to_string(),
                "Run from within a theme directory containing config.json".to_string(),
            ],
            ReleaseError::Validation(ValidationError::DuplicateChangelogEntry { version }) => vec![
                format!("Remove the existing '## {version}' section from CHANGELOG.md"),
                "Pick a version that has not been released yet".to_string(),
            ],
            ReleaseError::Repository(RepositoryError::PushRejected { .. }) => vec![
                "Pull and rebase: git pull --rebase".to_string(),
                "Push the release commit manually: git push".to_string(),
            ],
            ReleaseError::Publication(_) => vec![
                "The version is already committed and pushed; only publication failed".to_string(),
                "Verify the hosting token has repo scope and create the release entry manually"
                    .to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

/// Wrap an IO error with the path it concerns
pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> ReleaseError {
    ReleaseError::Io {
        path: path.into(),
        source,
    }
}
