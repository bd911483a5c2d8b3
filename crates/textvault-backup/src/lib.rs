//! Textvault Backup System
//!
//! Point-in-time snapshots of the textvault data tree as gzip-compressed
//! tarballs, and restore from them.
//!
//! # Features
//!
//! - **Dated names**: `backup_YYYYMMDD.tar.gz`, versioned `_1`, `_2`, ... on collision
//!   unless the overwrite policy is configured
//! - **Relative entries**: archives can be restored under any destination
//! - **No truncated archives**: creation is staged and renamed into place on success
//! - **Path-safe restore**: absolute, `..` and link entries are rejected
//! - **Integrity**: SHA-256 recorded at creation and checked before restore
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use textvault_backup::ArchiveManager;
//! use textvault_core::ActivityLog;
//!
//! #[tokio::main]
//! async fn main() -> textvault_backup::Result<()> {
//!     let mut manager = ArchiveManager::new("project_root/backups", ActivityLog::disabled());
//!
//!     let handle = manager.create_archive(Utf8Path::new("project_root/data")).await?;
//!     println!("Backup created: {} ({} bytes)", handle.path, handle.size_bytes);
//!
//!     manager.restore_archive(&handle, Utf8Path::new("restored")).await?;
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod checksum;
pub mod error;
pub mod naming;
pub mod restore;
pub mod state;

pub use archive::{ArchiveHandle, ArchiveManager};
pub use checksum::calculate_checksum;
pub use error::{BackupError, Result};
pub use naming::{archive_file_name, parse_archive_date, resolve_archive_path};
pub use restore::{normalize_entry_path, RestoreSummary};
pub use state::ArchiveState;
