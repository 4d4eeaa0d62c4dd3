//! Store access configuration.
//!
//! The store credential file persists the access token and store URL used by
//! the wider theme tooling. The release flow reads it once at startup and
//! never mutates it.

use crate::error::{Result, io_error};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Store credential file name in the theme root
pub const STORE_FILE: &str = "secrets.json";

/// Access token and store URL persisted locally
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// API access token for the store
    pub access_token: Option<String>,
    /// Public URL of the store
    pub normal_store_url: Option<String>,
}

/// Reads and writes the store credential file
#[derive(Debug, Clone)]
pub struct StoreConfigManager {
    path: PathBuf,
}

impl StoreConfigManager {
    /// Create a manager for the credential file in a theme checkout
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            path: root.into().join(STORE_FILE),
        }
    }

    /// Read the store configuration; `Ok(None)` when no file exists
    pub async fn read(&self) -> Result<Option<StoreConfig>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&self.path, e)),
        }
    }

    /// Persist the store configuration
    pub async fn save(&self, config: &StoreConfig) -> Result<()> {
        let mut text = serde_json::to_string_pretty(config)?;
        text.push('\n');
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|e| io_error(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = StoreConfigManager::new(dir.path());
        assert!(manager.read().await.expect("read").is_none());
    }

    #[tokio::test]
    async fn save_then_read_round_trips_camel_case_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = StoreConfigManager::new(dir.path());

        let config = StoreConfig {
            access_token: Some("accessToken_value".to_string()),
            normal_store_url: Some("https://www.example.com".to_string()),
        };
        manager.save(&config).await.expect("save");

        let on_disk =
            std::fs::read_to_string(dir.path().join(STORE_FILE)).expect("read raw file");
        assert!(on_disk.contains("accessToken"));
        assert!(on_disk.contains("normalStoreUrl"));

        let read = manager.read().await.expect("read").expect("present");
        assert_eq!(read.access_token.as_deref(), Some("accessToken_value"));
        assert_eq!(read.normal_store_url.as_deref(), Some("https://www.example.com"));
    }
}
