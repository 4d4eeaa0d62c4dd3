//! Git collaborators for the release flow.
//!
//! [`GitClient`] is the capability trait the orchestrator consumes;
//! [`SystemGit`] implements it over the system `git` binary, and
//! [`RepositoryGate`] sequences the validated status/commit/push steps.

mod client;
mod gate;

pub use client::{GitClient, GitStatus, RemoteDescriptor, SystemGit};
pub use gate::RepositoryGate;
