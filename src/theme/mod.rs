//! Theme configuration reader.
//!
//! A theme checkout carries a `config.json` with the theme name, the current
//! version, and author metadata, plus an optional `schema.json`. The release
//! flow reads these; the only write is the version bump, performed through the
//! filesystem collaborator with [`render_version_update`].

use crate::changelog::AuthorMetadata;
use crate::error::{Result, ValidationError, io_error};
use semver::Version;
use serde::Deserialize;
use std::future::Future;
use std::path::PathBuf;

/// Theme configuration file name
pub const CONFIG_FILE: &str = "config.json";
/// Theme schema file name
pub const SCHEMA_FILE: &str = "schema.json";

/// Author metadata block of a theme configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeMeta {
    /// Author display name
    pub author_name: Option<String>,
    /// Author contact email
    pub author_email: Option<String>,
    /// Support URL for the theme
    pub author_support_url: Option<String>,
}

/// Read-only view of a theme configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeRawConfig {
    /// Theme name
    pub name: Option<String>,
    /// Current theme version
    pub version: Option<String>,
    /// Author metadata
    #[serde(default)]
    pub meta: ThemeMeta,
}

impl ThemeRawConfig {
    /// Author attribution for release-note rendering
    pub fn author(&self) -> AuthorMetadata {
        AuthorMetadata {
            name: self.meta.author_name.clone(),
            email: self.meta.author_email.clone(),
            support_url: self.meta.author_support_url.clone(),
        }
    }
}

/// Trait for the theme-configuration reads the orchestrator performs
pub trait ThemeConfig {
    /// Whether `config.json` exists in the theme root
    fn config_exists(&self) -> bool;

    /// Whether `schema.json` exists in the theme root
    fn schema_exists(&self) -> bool;

    /// Path to the version-bearing configuration file
    fn config_path(&self) -> PathBuf;

    /// Current theme version
    fn version(&self) -> impl Future<Output = Result<Version>> + Send;

    /// Theme name
    fn name(&self) -> impl Future<Output = Result<String>> + Send;

    /// Full read-only configuration
    fn raw_config(&self) -> impl Future<Output = Result<ThemeRawConfig>> + Send;
}

/// Theme configuration manager over a theme checkout directory
#[derive(Debug, Clone)]
pub struct ThemeConfigManager {
    root: PathBuf,
}

impl ThemeConfigManager {
    /// Create a manager rooted at the theme checkout
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn read_raw(&self) -> Result<ThemeRawConfig> {
        let path = self.config_path();
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| io_error(&path, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl ThemeConfig for ThemeConfigManager {
    fn config_exists(&self) -> bool {
        self.root.join(CONFIG_FILE).is_file()
    }

    fn schema_exists(&self) -> bool {
        self.root.join(SCHEMA_FILE).is_file()
    }

    fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    async fn version(&self) -> Result<Version> {
        let raw = self.read_raw().await?;
        let version = raw.version.ok_or_else(|| ValidationError::UnsupportedEnvironment {
            reason: format!("{CONFIG_FILE} carries no version field"),
        })?;
        Version::parse(&version)
            .map_err(|source| {
                ValidationError::InvalidVersionFormat {
                    candidate: version,
                    source,
                }
                .into()
            })
    }

    async fn name(&self) -> Result<String> {
        let raw = self.read_raw().await?;
        raw.name
            .ok_or_else(|| {
                ValidationError::UnsupportedEnvironment {
                    reason: format!("{CONFIG_FILE} carries no theme name"),
                }
                .into()
            })
    }

    async fn raw_config(&self) -> Result<ThemeRawConfig> {
        self.read_raw().await
    }
}

/// Rewrite the version field of a configuration document, preserving every
/// other field.
pub fn render_version_update(config_text: &str, version: &Version) -> Result<String> {
    let mut value: serde_json::Value = serde_json::from_str(config_text)?;
    if let Some(object) = value.as_object_mut() {
        object.insert(
            "version".to_string(),
            serde_json::Value::String(version.to_string()),
        );
    }
    let mut rendered = serde_json::to_string_pretty(&value)?;
    rendered.push('\n');
    Ok(rendered)
}
