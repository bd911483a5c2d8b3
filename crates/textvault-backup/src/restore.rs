//! Archive extraction with path-integrity checks
//!
//! Every entry name is checked before anything is written. Entries are
//! extracted in archive order; the first bad entry aborts the restore and
//! files already extracted stay where they are.

use crate::checksum::calculate_checksum;
use crate::error::{BackupError, Result};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tar::Archive;
use tracing::debug;

/// Outcome of a successful restore
#[derive(Debug, Clone)]
pub struct RestoreSummary {
    /// Destination the archive was extracted into
    pub destination: Utf8PathBuf,
    /// Regular files written
    pub restored: usize,
    /// Directory entries created
    pub directories: usize,
    pub duration: Duration,
}

/// Normalize an entry name to a path relative to the extraction root.
///
/// Rejects absolute names, drive prefixes and any `..` component. `.`
/// components are dropped, so an entry naming the root itself (`./`)
/// normalizes to the empty path.
pub fn normalize_entry_path(raw: &Path) -> Result<Utf8PathBuf> {
    let path = Utf8Path::from_path(raw).ok_or_else(|| {
        BackupError::path_traversal(raw.to_string_lossy(), "name is not valid UTF-8")
    })?;

    let mut clean = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::Normal(part) => clean.push(part),
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                return Err(BackupError::path_traversal(path.as_str(), "contains '..'"));
            }
            Utf8Component::RootDir | Utf8Component::Prefix(_) => {
                return Err(BackupError::path_traversal(path.as_str(), "absolute path"));
            }
        }
    }
    Ok(clean)
}

/// Extract `archive_path` into `destination`.
///
/// When `expected_checksum` is given the archive bytes must still match it.
pub(crate) fn extract_archive(
    archive_path: &Utf8Path,
    destination: &Utf8Path,
    expected_checksum: Option<&str>,
) -> Result<RestoreSummary> {
    let start = Instant::now();

    if let Some(expected) = expected_checksum {
        let actual = calculate_checksum(archive_path.as_std_path())
            .map_err(|e| BackupError::archive_io(archive_path.as_str(), e))?;
        if actual != expected {
            return Err(BackupError::ChecksumMismatch {
                path: archive_path.to_string(),
                expected: expected.to_string(),
                actual,
            });
        }
    }

    fs::create_dir_all(destination).map_err(|e| BackupError::archive_io(destination.as_str(), e))?;
    let root = destination
        .canonicalize_utf8()
        .map_err(|e| BackupError::archive_io(destination.as_str(), e))?;

    let file = File::open(archive_path).map_err(|e| BackupError::archive_io(archive_path.as_str(), e))?;
    let mut archive = Archive::new(GzDecoder::new(file));
    let archive_io = |e: io::Error| BackupError::archive_io(archive_path.as_str(), e);

    let mut restored = 0;
    let mut directories = 0;

    for entry in archive.entries().map_err(archive_io)? {
        let mut entry = entry.map_err(archive_io)?;
        let raw = entry.path().map_err(archive_io)?.into_owned();
        let kind = entry.header().entry_type();

        if kind.is_pax_global_extensions() {
            continue;
        }

        let relative = normalize_entry_path(&raw)?;
        if relative.as_str().is_empty() {
            // `./` as written by `tar -C dir .`
            if kind.is_dir() {
                continue;
            }
            return Err(BackupError::path_traversal(raw.to_string_lossy(), "empty name"));
        }

        let target = root.join(&relative);
        if kind.is_dir() {
            create_dirs_within(&root, &relative)?;
            directories += 1;
        } else if kind.is_file() {
            if let Some(parent) = relative.parent() {
                create_dirs_within(&root, parent)?;
            }
            if fs::symlink_metadata(&target).is_ok_and(|m| m.file_type().is_symlink()) {
                return Err(BackupError::path_traversal(
                    relative.as_str(),
                    "destination is a symbolic link",
                ));
            }

            let mut out = File::create(&target).map_err(|e| BackupError::archive_io(target.as_str(), e))?;
            io::copy(&mut entry, &mut out).map_err(|e| BackupError::archive_io(target.as_str(), e))?;
            debug!("Restored {}", relative);
            restored += 1;
        } else if kind.is_symlink() || kind.is_hard_link() {
            return Err(BackupError::path_traversal(
                relative.as_str(),
                "link entries are not restored",
            ));
        } else {
            return Err(BackupError::unsupported_entry(
                relative.as_str(),
                format!("{:?}", kind),
            ));
        }
    }

    Ok(RestoreSummary {
        destination: root,
        restored,
        directories,
        duration: start.elapsed(),
    })
}

/// Create `root/relative` one component at a time.
///
/// Fails before creating anything beneath a component that is a symbolic
/// link, so a link already in the destination cannot redirect the restore.
fn create_dirs_within(root: &Utf8Path, relative: &Utf8Path) -> Result<()> {
    let mut current = root.to_path_buf();
    for component in relative.components() {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                return Err(BackupError::path_traversal(
                    relative.as_str(),
                    format!("{} is a symbolic link", current),
                ));
            }
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(BackupError::archive_io(
                    current.as_str(),
                    io::Error::new(io::ErrorKind::AlreadyExists, "not a directory"),
                ));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir(&current).map_err(|e| BackupError::archive_io(current.as_str(), e))?;
            }
            Err(e) => return Err(BackupError::archive_io(current.as_str(), e)),
        }
    }
    Ok(())
}
