//! # theme-release
//!
//! Release automation for themed storefront packages.
//!
//! One interactive command takes a theme checkout from "dirty working state,
//! old version" to "tagged, pushed, published new version": it bumps the
//! semantic version, rewrites the changelog, builds a distributable bundle,
//! commits and pushes through git, and optionally publishes a GitHub release
//! with the bundle attached.
//!
//! The core is the [`release::ReleaseOrchestrator`]: a linear pipeline of
//! validation gates and external calls over injected collaborators (git,
//! prompts, bundler, theme configuration, filesystem, hosting API), aborting
//! on the first failure and never mutating git state before every validation
//! and the bundle build have passed.
//!
//! ## Usage
//!
//! ```bash
//! cd my-theme && theme_release
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bundle;
pub mod changelog;
pub mod cli;
pub mod error;
pub mod fsutil;
pub mod git;
pub mod github;
pub mod prompt;
pub mod release;
pub mod store;
pub mod theme;
pub mod version;

pub use bundle::{Bundler, ZipBundler};
pub use changelog::{AuthorMetadata, ChangelogEditor, RenderedChangelog};
pub use cli::OutputManager;
pub use error::{PublicationError, ReleaseError, RepositoryError, Result, ValidationError};
pub use fsutil::{FileStore, LocalFileStore};
pub use git::{GitClient, GitStatus, RemoteDescriptor, RepositoryGate, SystemGit};
pub use github::{GitHubClient, HostingClient, ReleasePublisher, ReleaseRecord, RepoIdentity};
pub use prompt::{Prompter, TerminalPrompter};
pub use release::{ReleaseFailure, ReleaseOrchestrator, ReleaseOutcome, ReleasePhase, ReleaseSummary};
pub use store::{StoreConfig, StoreConfigManager};
pub use theme::{ThemeConfig, ThemeConfigManager, ThemeRawConfig};
pub use version::VersionPolicy;
