// ============================================================
// Layer 4 — Archive Extractor
// ============================================================
// Expands an uploaded zip archive into the retraining working
// directory.
//
// Two hard rules:
//   1. The working directory is always FRESH — anything left
//      over from a previous run is deleted before extraction,
//      so one retrain can never see another's files.
//   2. No entry may escape the working directory. Zip entry
//      names are attacker-controlled strings like
//      "../../etc/passwd"; every entry must resolve to a path
//      INSIDE the working directory or the whole archive is
//      rejected as invalid.
//
// On any extraction failure the working directory is removed
// again, so an invalid archive leaves no partial state behind.
//
// Reference: zip crate documentation (ZipArchive, enclosed_name)

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context;
use zip::ZipArchive;

use crate::error::ServiceError;

/// Expands archives into (and cleans up) one working directory.
pub struct ArchiveExtractor {
    working_dir: PathBuf,
}

impl ArchiveExtractor {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Extract an in-memory archive into a fresh working directory
    /// and return its path.
    ///
    /// Errors:
    ///   - `InvalidArchive` for malformed zip data, corrupt entries,
    ///     or path-traversal attempts — nothing survives on disk
    ///   - `Internal` for filesystem failures on our side
    pub fn extract(&self, archive: &[u8]) -> Result<&Path, ServiceError> {
        self.reset_working_dir()?;

        match self.unpack(archive) {
            Ok(()) => Ok(&self.working_dir),
            Err(err) => {
                // Reject the whole archive: remove whatever was
                // already written before the bad entry.
                self.cleanup();
                Err(err)
            }
        }
    }

    /// Remove the working directory and everything under it.
    /// Safe to call when it does not exist.
    pub fn cleanup(&self) {
        if self.working_dir.exists() {
            if let Err(err) = fs::remove_dir_all(&self.working_dir) {
                tracing::warn!(
                    "Could not remove working directory '{}': {}",
                    self.working_dir.display(),
                    err
                );
            }
        }
    }

    /// Delete any previous working directory, then recreate it empty.
    fn reset_working_dir(&self) -> Result<(), ServiceError> {
        if self.working_dir.exists() {
            fs::remove_dir_all(&self.working_dir)
                .with_context(|| {
                    format!(
                        "Cannot clear working directory '{}'",
                        self.working_dir.display()
                    )
                })
                .map_err(ServiceError::Internal)?;
        }
        fs::create_dir_all(&self.working_dir)
            .with_context(|| {
                format!(
                    "Cannot create working directory '{}'",
                    self.working_dir.display()
                )
            })
            .map_err(ServiceError::Internal)?;
        Ok(())
    }

    fn unpack(&self, archive: &[u8]) -> Result<(), ServiceError> {
        let mut zip = ZipArchive::new(Cursor::new(archive))
            .map_err(|e| ServiceError::InvalidArchive(e.to_string()))?;

        for i in 0..zip.len() {
            let mut entry = zip
                .by_index(i)
                .map_err(|e| ServiceError::InvalidArchive(e.to_string()))?;

            // enclosed_name() yields the entry path only when it
            // stays inside the extraction root: no absolute paths,
            // no ".." components. None means traversal — reject.
            let relative = entry.enclosed_name().ok_or_else(|| {
                ServiceError::InvalidArchive(format!(
                    "entry '{}' escapes the extraction directory",
                    entry.name()
                ))
            })?;
            let dest = self.working_dir.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&dest)
                    .with_context(|| format!("Cannot create '{}'", dest.display()))
                    .map_err(ServiceError::Internal)?;
                continue;
            }

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Cannot create '{}'", parent.display()))
                    .map_err(ServiceError::Internal)?;
            }

            let mut out = fs::File::create(&dest)
                .with_context(|| format!("Cannot create '{}'", dest.display()))
                .map_err(ServiceError::Internal)?;

            // A copy failure here usually means a corrupt deflate
            // stream, which is the uploader's problem, not ours.
            std::io::copy(&mut entry, &mut out).map_err(|e| {
                ServiceError::InvalidArchive(format!(
                    "corrupt entry '{}': {}",
                    entry.name(),
                    e
                ))
            })?;
        }

        tracing::debug!(
            "Extracted {} entries into '{}'",
            zip.len(),
            self.working_dir.display()
        );
        Ok(())
    }
}
