//! Command line argument parsing.
//!
//! The release command takes no flags beyond version display: run it from a
//! theme checkout and it walks through the release interactively.

use clap::Parser;

/// Release a theme: bump the version, update the changelog, bundle, commit,
/// push, and optionally publish a GitHub release.
#[derive(Parser, Debug)]
#[command(
    name = "theme_release",
    version,
    about = "Release a theme from the current directory",
    long_about = "Walks through a theme release interactively:\n\
  - validates the environment and a clean working tree\n\
  - prompts for the next version and validates it\n\
  - builds the bundle, updates CHANGELOG.md and config.json\n\
  - commits and pushes the release\n\
  - optionally publishes a GitHub release with the bundle attached"
)]
pub struct Args {}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
