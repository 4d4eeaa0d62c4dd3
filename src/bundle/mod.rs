//! Bundler collaborator.
//!
//! The orchestrator needs exactly one operation from the bundler: produce a
//! filesystem path to a packaged artifact. [`ZipBundler`] zips the theme
//! checkout; archive internals beyond that are the wider bundling tooling's
//! concern.

use crate::error::{ReleaseError, Result};
use crate::store::STORE_FILE;
use semver::Version;
use std::fs::File;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Directories never included in a bundle
const EXCLUDED_DIRS: &[&str] = &[".git", "node_modules", "target"];

/// Files never included in a bundle; the store credential file must not ship
/// in a distributable artifact
const EXCLUDED_FILES: &[&str] = &[STORE_FILE];

/// Trait for producing the distributable bundle artifact
pub trait Bundler {
    /// Package the theme; returns the path of the created artifact
    fn bundle(
        &self,
        theme_name: &str,
        version: &Version,
    ) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Bundler that zips the theme checkout
#[derive(Debug, Clone)]
pub struct ZipBundler {
    theme_root: PathBuf,
}

impl ZipBundler {
    /// Create a bundler over a theme checkout directory
    pub fn new(theme_root: impl Into<PathBuf>) -> Self {
        Self {
            theme_root: theme_root.into(),
        }
    }
}

impl Bundler for ZipBundler {
    async fn bundle(&self, theme_name: &str, version: &Version) -> Result<PathBuf> {
        let artifact = self
            .theme_root
            .join(format!("{theme_name}-{version}.zip"));
        let root = self.theme_root.clone();
        let output = artifact.clone();

        // Archive creation is blocking CPU/disk work; keep it off the runtime.
        tokio::task::spawn_blocking(move || write_zip(&root, &output))
            .await
            .map_err(|e| ReleaseError::Bundle(format!("bundler task failed: {e}")))??;

        Ok(artifact)
    }
}

fn write_zip(root: &Path, output: &Path) -> Result<()> {
    let bundle_err = |e: String| ReleaseError::Bundle(e);

    let file = File::create(output)
        .map_err(|e| bundle_err(format!("cannot create {}: {e}", output.display())))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir() {
            !EXCLUDED_DIRS.contains(&name.as_ref())
        } else {
            !EXCLUDED_FILES.contains(&name.as_ref())
        }
    });

    for entry in walker {
        let entry = entry.map_err(|e| bundle_err(format!("walk failed: {e}")))?;
        let path = entry.path();
        if path == root || path == output {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .map_err(|e| bundle_err(format!("path outside theme root: {e}")))?
            .to_string_lossy()
            .replace('\\', "/");

        if entry.file_type().is_dir() {
            writer
                .add_directory(relative, options)
                .map_err(|e| bundle_err(format!("cannot add directory: {e}")))?;
        } else if entry.file_type().is_file() {
            writer
                .start_file(relative, options)
                .map_err(|e| bundle_err(format!("cannot start entry: {e}")))?;
            let mut source = File::open(path)
                .map_err(|e| bundle_err(format!("cannot open {}: {e}", path.display())))?;
            io::copy(&mut source, &mut writer)
                .map_err(|e| bundle_err(format!("cannot write {}: {e}", path.display())))?;
        }
    }

    writer
        .finish()
        .map_err(|e| bundle_err(format!("cannot finalize archive: {e}")))?;
    Ok(())
}
