//! Filesystem collaborator for the changelog and version-bearing config files.

use crate::error::{Result, io_error};
use std::future::Future;
use std::path::Path;

/// Trait for the file reads and writes the release flow performs
pub trait FileStore {
    /// Read a file to a string; `Ok(None)` when it does not exist
    fn read_to_string(&self, path: &Path) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Write a file, creating it if needed
    fn write(&self, path: &Path, contents: &str) -> impl Future<Output = Result<()>> + Send;

    /// Remove a file
    fn remove(&self, path: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// FileStore over the local filesystem via `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl FileStore for LocalFileStore {
    async fn read_to_string(&self, path: &Path) -> Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(path, e)),
        }
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<()> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| io_error(path, e))
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| io_error(path, e))
    }
}
