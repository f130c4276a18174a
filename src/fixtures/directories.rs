//! Filesystem fixtures: persistent sample directories and per-test scratch space.
//!
//! Directory creation failures are environment misconfiguration and are
//! returned as errors, never downgraded to a skip.

use crate::config::FixturesConfig;
use crate::errors::{DoclingtaxaError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create `path` (and missing parents) if absent and return its absolute form
pub fn ensure_dir(path: &Path) -> Result<PathBuf> {
    fs::create_dir_all(path).map_err(|e| {
        DoclingtaxaError::io(e, format!("Failed to create fixture directory {}", path.display()))
    })?;

    let resolved = fs::canonicalize(path).map_err(|e| {
        DoclingtaxaError::io(e, format!("Failed to resolve fixture directory {}", path.display()))
    })?;

    tracing::debug!(path = %resolved.display(), "Fixture directory ready");
    Ok(resolved)
}

/// Synthetic sample inputs (`tests/fixtures/sample_pdfs`). Never deleted.
pub fn sample_pdf_dir(fixtures: &FixturesConfig) -> Result<PathBuf> {
    ensure_dir(&fixtures.sample_pdfs_path())
}

/// Real sample inputs (`<project root>/monografias`). Never deleted.
pub fn monografias_dir(fixtures: &FixturesConfig) -> Result<PathBuf> {
    ensure_dir(&fixtures.monografias_path())
}

/// Scratch directory for PDF files inside a caller-supplied unique root
pub fn temp_pdf_dir(fixtures: &FixturesConfig, root: &Path) -> Result<PathBuf> {
    let path = root.join(&fixtures.temp_pdfs_dir);
    fs::create_dir_all(&path).map_err(|e| {
        DoclingtaxaError::io(e, format!("Failed to create temporary directory {}", path.display()))
    })?;
    Ok(path)
}

/// A per-test scratch directory.
///
/// Owns a fresh temporary root; the root and everything under it is removed
/// when this value is dropped.
#[derive(Debug)]
pub struct TempPdfDir {
    root: TempDir,
    path: PathBuf,
}

impl TempPdfDir {
    pub fn new(fixtures: &FixturesConfig) -> Result<Self> {
        let root = tempfile::Builder::new().prefix("doclingtaxa-").tempdir().map_err(|e| {
            DoclingtaxaError::io(e, "Failed to create temporary root directory".to_string())
        })?;
        let path = temp_pdf_dir(fixtures, root.path())?;
        Ok(Self { root, path })
    }

    /// The scratch directory itself
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The unique temporary root containing the scratch directory
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Remove the temporary root now, reporting any failure
    pub fn close(self) -> Result<()> {
        self.root
            .close()
            .map_err(|e| DoclingtaxaError::io(e, "Failed to remove temporary root".to_string()))
    }
}

impl AsRef<Path> for TempPdfDir {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
