//! Directory layout of a textvault data root

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Processed-data manifest file name
pub const PROCESSED_MANIFEST: &str = "processed_data.json";

/// File-info manifest file name
pub const FILE_INFO_MANIFEST: &str = "file_info.json";

/// Activity log file name
pub const LOG_FILE: &str = "project_log.txt";

/// Paths of the data root's subtrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: Utf8PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Tree that is archived: `raw/` and `processed/`
    pub fn data_dir(&self) -> Utf8PathBuf {
        self.root.join("data")
    }

    /// Pipeline input
    pub fn raw_dir(&self) -> Utf8PathBuf {
        self.data_dir().join("raw")
    }

    /// Pipeline output
    pub fn processed_dir(&self) -> Utf8PathBuf {
        self.data_dir().join("processed")
    }

    /// Manifests and reports
    pub fn output_dir(&self) -> Utf8PathBuf {
        self.root.join("output")
    }

    /// Dated archives
    pub fn backups_dir(&self) -> Utf8PathBuf {
        self.root.join("backups")
    }

    pub fn logs_dir(&self) -> Utf8PathBuf {
        self.root.join("logs")
    }

    pub fn log_file(&self) -> Utf8PathBuf {
        self.logs_dir().join(LOG_FILE)
    }

    pub fn processed_manifest(&self) -> Utf8PathBuf {
        self.output_dir().join(PROCESSED_MANIFEST)
    }

    pub fn file_info_manifest(&self) -> Utf8PathBuf {
        self.output_dir().join(FILE_INFO_MANIFEST)
    }

    /// Create every directory of the layout. Existing directories are kept.
    pub fn ensure(&self) -> Result<()> {
        for dir in [
            self.raw_dir(),
            self.processed_dir(),
            self.output_dir(),
            self.backups_dir(),
            self.logs_dir(),
        ] {
            fs::create_dir_all(&dir)?;
            tracing::debug!("Ensured directory {}", dir);
        }
        Ok(())
    }
}
