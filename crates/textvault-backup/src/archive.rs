//! Archive creation and the archive manager.
//!
//! Archives are gzip-compressed tarballs whose entry names are paths
//! relative to the archived tree. An archive is staged as a hidden
//! temporary file inside the backups directory and renamed into place only
//! once every entry has been written and the stream closed, so a failed
//! creation never leaves a truncated archive behind.

use crate::checksum::calculate_checksum;
use crate::error::{BackupError, Result};
use crate::naming::{parse_archive_date, resolve_archive_path};
use crate::restore::{extract_archive, RestoreSummary};
use crate::state::ArchiveState;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Local, NaiveDate};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io;
use tar::{Archive, Builder as TarBuilder};
use textvault_core::walk::{regular_files, relative_slash_path};
use textvault_core::{ActivityLog, CollisionPolicy};
use tracing::{debug, info, warn};

const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Identity of a finished archive, threaded from creation to restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHandle {
    /// Location of the archive file
    pub path: Utf8PathBuf,

    /// Date taken from the file name, when it follows the naming scheme
    pub created_on: Option<NaiveDate>,

    /// Number of file entries
    pub entry_count: usize,

    /// Size of the archive in bytes
    pub size_bytes: u64,

    /// Hex SHA-256 of the archive bytes
    pub checksum: String,
}

impl ArchiveHandle {
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or(self.path.as_str())
    }
}

/// Creates dated snapshots of a data tree and restores them.
pub struct ArchiveManager {
    backups_dir: Utf8PathBuf,
    compression_level: u32,
    collision: CollisionPolicy,
    state: ArchiveState,
    log: ActivityLog,
}

impl ArchiveManager {
    pub fn new(backups_dir: impl Into<Utf8PathBuf>, log: ActivityLog) -> Self {
        Self {
            backups_dir: backups_dir.into(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            collision: CollisionPolicy::default(),
            state: ArchiveState::Idle,
            log,
        }
    }

    /// Sets the gzip level, clamped to 1-9.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.clamp(1, 9);
        self
    }

    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    pub fn state(&self) -> ArchiveState {
        self.state
    }

    pub fn backups_dir(&self) -> &Utf8Path {
        &self.backups_dir
    }

    /// Archive `source_tree` under today's local date.
    pub async fn create_archive(&mut self, source_tree: &Utf8Path) -> Result<ArchiveHandle> {
        self.create_archive_on(source_tree, Local::now().date_naive())
            .await
    }

    /// Archive `source_tree` under the name for `date`.
    pub async fn create_archive_on(
        &mut self,
        source_tree: &Utf8Path,
        date: NaiveDate,
    ) -> Result<ArchiveHandle> {
        self.state.transition(ArchiveState::Creating)?;
        info!("Creating archive of {} in {}", source_tree, self.backups_dir);

        let source = source_tree.to_path_buf();
        let backups_dir = self.backups_dir.clone();
        let level = self.compression_level;
        let collision = self.collision;

        let result = tokio::task::spawn_blocking(move || {
            write_archive(&source, &backups_dir, date, level, collision)
        })
        .await
        .map_err(|e| BackupError::archive_io(source_tree.as_str(), io::Error::other(e)))
        .and_then(|r| r);

        match result {
            Ok(handle) => {
                self.state.transition(ArchiveState::Created)?;
                self.log.record(format!(
                    "Backup created: {} ({} files, {} bytes, sha256 {})",
                    handle.path, handle.entry_count, handle.size_bytes, handle.checksum
                ));
                Ok(handle)
            }
            Err(e) => {
                self.state.transition(ArchiveState::Failed)?;
                self.log
                    .record_failure(format!("Backup of {} failed: {}", source_tree, e));
                Err(e)
            }
        }
    }

    /// Extract the archive behind `handle` into `destination`.
    ///
    /// The archive must still carry the checksum recorded in the handle.
    pub async fn restore_archive(
        &mut self,
        handle: &ArchiveHandle,
        destination: &Utf8Path,
    ) -> Result<RestoreSummary> {
        self.state.transition(ArchiveState::Restoring)?;
        info!("Restoring {} into {}", handle.path, destination);

        let result = if handle.path.is_file() {
            let archive_path = handle.path.clone();
            let dest = destination.to_path_buf();
            let checksum = handle.checksum.clone();
            tokio::task::spawn_blocking(move || {
                extract_archive(&archive_path, &dest, Some(&checksum))
            })
            .await
            .map_err(|e| BackupError::archive_io(handle.path.as_str(), io::Error::other(e)))
            .and_then(|r| r)
        } else {
            Err(BackupError::ArchiveNotFound {
                path: handle.path.to_string(),
            })
        };

        match result {
            Ok(summary) => {
                self.state.transition(ArchiveState::Restored)?;
                self.log.record(format!(
                    "Backup restored: {} -> {} ({} files)",
                    handle.file_name(),
                    summary.destination,
                    summary.restored
                ));
                Ok(summary)
            }
            Err(e) => {
                self.state.transition(ArchiveState::Failed)?;
                self.log
                    .record_failure(format!("Restore of {} failed: {}", handle.path, e));
                Err(e)
            }
        }
    }

    /// Handle for an archive already on disk.
    pub fn open(path: &Utf8Path) -> Result<ArchiveHandle> {
        if !path.is_file() {
            return Err(BackupError::ArchiveNotFound {
                path: path.to_string(),
            });
        }
        let io_err = |e: io::Error| BackupError::archive_io(path.as_str(), e);

        let file = File::open(path).map_err(io_err)?;
        let mut archive = Archive::new(GzDecoder::new(file));
        let mut entry_count = 0;
        for entry in archive.entries().map_err(io_err)? {
            if entry.map_err(io_err)?.header().entry_type().is_file() {
                entry_count += 1;
            }
        }

        Ok(ArchiveHandle {
            path: path.to_path_buf(),
            created_on: path.file_name().and_then(parse_archive_date),
            entry_count,
            size_bytes: fs::metadata(path).map_err(io_err)?.len(),
            checksum: calculate_checksum(path.as_std_path()).map_err(io_err)?,
        })
    }
}

fn write_archive(
    source: &Utf8Path,
    backups_dir: &Utf8Path,
    date: NaiveDate,
    level: u32,
    collision: CollisionPolicy,
) -> Result<ArchiveHandle> {
    if !source.is_dir() {
        return Err(BackupError::archive_io(
            source.as_str(),
            io::Error::new(io::ErrorKind::NotFound, "source tree is not a directory"),
        ));
    }
    fs::create_dir_all(backups_dir).map_err(|e| BackupError::archive_io(backups_dir.as_str(), e))?;

    let mut files = regular_files(source)?;
    // The backups directory may live inside the archived tree
    files.retain(|f| !f.starts_with(backups_dir));

    let target = resolve_archive_path(backups_dir, date, collision);
    let mut handle = stage_archive(source, &files, &target, level)?;
    handle.created_on = Some(date);
    Ok(handle)
}

/// Write `files` into a temporary archive next to `target`, then move it
/// into place. The temporary file is removed on any error.
fn stage_archive(
    source: &Utf8Path,
    files: &[Utf8PathBuf],
    target: &Utf8Path,
    level: u32,
) -> Result<ArchiveHandle> {
    let staging_dir = target.parent().unwrap_or(Utf8Path::new("."));
    let staging = tempfile::Builder::new()
        .prefix(".backup-")
        .suffix(".partial")
        .tempfile_in(staging_dir)
        .map_err(|e| BackupError::archive_io(staging_dir.as_str(), e))?;
    let staging_io = |e: io::Error| BackupError::archive_io(staging.path().to_string_lossy(), e);

    {
        let encoder = GzEncoder::new(staging.as_file(), Compression::new(level));
        let mut tar = TarBuilder::new(encoder);
        for file in files {
            let name = relative_slash_path(file, source)?;
            tar.append_path_with_name(file, &name)
                .map_err(|e| BackupError::archive_io(file.as_str(), e))?;
            debug!("Archived {}", name);
        }
        let encoder = tar.into_inner().map_err(staging_io)?;
        encoder.finish().map_err(staging_io)?;
    }
    staging.as_file().sync_all().map_err(staging_io)?;

    let checksum = calculate_checksum(staging.path()).map_err(staging_io)?;
    let size_bytes = staging.as_file().metadata().map_err(staging_io)?.len();

    if target.exists() {
        warn!("Overwriting existing archive {}", target);
    }
    staging
        .persist(target)
        .map_err(|e| BackupError::archive_io(target.as_str(), e.error))?;

    info!("Archive created: {} ({} files)", target, files.len());

    Ok(ArchiveHandle {
        path: target.to_path_buf(),
        created_on: None,
        entry_count: files.len(),
        size_bytes,
        checksum,
    })
}
