//! File-system metadata collection

use crate::activity::ActivityLog;
use crate::error::{Error, Result};
use crate::manifest::write_manifest;
use crate::types::FileMetadata;
use crate::walk::{regular_files, relative_slash_path};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use std::fs;

/// Captures per-file attributes under a declared root.
///
/// Attributes are read from the file system on every call; nothing is
/// cached. Traversal matches the archive's (see [`crate::walk`]).
#[derive(Debug, Clone)]
pub struct MetadataCollector {
    root: Utf8PathBuf,
    log: ActivityLog,
}

impl MetadataCollector {
    /// `root` is what every [`FileMetadata::path`] is made relative to.
    pub fn new(root: impl Into<Utf8PathBuf>, log: ActivityLog) -> Self {
        Self {
            root: root.into(),
            log,
        }
    }

    /// Metadata for every regular file under `dir`.
    pub fn collect(&self, dir: &Utf8Path) -> Result<Vec<FileMetadata>> {
        if !dir.starts_with(&self.root) {
            return Err(Error::outside_root(dir.as_str(), self.root.as_str()));
        }

        let mut entries = Vec::new();
        for path in regular_files(dir)? {
            entries.push(self.describe(&path)?);
        }

        tracing::debug!("Collected metadata for {} files in {}", entries.len(), dir);
        Ok(entries)
    }

    /// Collect `dir` and write the result to `manifest`.
    pub fn collect_to_manifest(&self, dir: &Utf8Path, manifest: &Utf8Path) -> Result<Vec<FileMetadata>> {
        let entries = self.collect(dir)?;
        write_manifest(manifest, &entries)?;
        self.log.record(format!(
            "File info for {} files serialized and saved to {}",
            entries.len(),
            manifest
        ));
        Ok(entries)
    }

    fn describe(&self, path: &Utf8Path) -> Result<FileMetadata> {
        let metadata = fs::metadata(path)?;
        let modified_at = DateTime::<Utc>::from(metadata.modified()?);

        Ok(FileMetadata {
            name: path.file_name().unwrap_or_default().to_string(),
            path: relative_slash_path(path, &self.root)?,
            byte_size: metadata.len(),
            created_at: created_at(&metadata).unwrap_or(modified_at),
            modified_at,
        })
    }
}

/// Birth time where the platform records one, else the inode change time.
fn created_at(metadata: &fs::Metadata) -> Option<DateTime<Utc>> {
    match metadata.created() {
        Ok(created) => Some(DateTime::<Utc>::from(created)),
        Err(_) => change_time(metadata),
    }
}

#[cfg(unix)]
fn change_time(metadata: &fs::Metadata) -> Option<DateTime<Utc>> {
    use std::os::unix::fs::MetadataExt;
    DateTime::<Utc>::from_timestamp(metadata.ctime(), metadata.ctime_nsec() as u32)
}

#[cfg(not(unix))]
fn change_time(_metadata: &fs::Metadata) -> Option<DateTime<Utc>> {
    None
}
