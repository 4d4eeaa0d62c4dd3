//! Semantic version validation for release candidates.
//!
//! Pure logic, no I/O: parses a candidate version string and enforces that it
//! strictly advances the current theme version.

use crate::error::ValidationError;
use semver::Version;

/// Validates and compares semantic versions for a release
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionPolicy;

impl VersionPolicy {
    /// Parse `candidate` and require it to be strictly greater than `current`.
    ///
    /// Returns the parsed target version, or:
    /// - [`ValidationError::InvalidVersionFormat`] if the candidate does not parse
    /// - [`ValidationError::VersionNotAdvancing`] if the candidate is equal to or
    ///   less than the current version
    pub fn validate_target(
        current: &Version,
        candidate: &str,
    ) -> Result<Version, ValidationError> {
        let target = Version::parse(candidate.trim()).map_err(|source| {
            ValidationError::InvalidVersionFormat {
                candidate: candidate.to_string(),
                source,
            }
        })?;

        if target <= *current {
            return Err(ValidationError::VersionNotAdvancing {
                current: current.clone(),
                candidate: target,
            });
        }

        Ok(target)
    }
}
