//! Append-only, timestamped activity log
//!
//! Every component receives an [`ActivityLog`] handle instead of writing to
//! a process-wide file. Lines are mirrored to `tracing`; a failure to append
//! is reported as a warning and never changes what the caller does.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Timestamp format of each log line.
pub const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Handle to the activity log file.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    path: Option<Utf8PathBuf>,
}

impl ActivityLog {
    /// Log that appends to `path`, creating it and its parent on first write.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Log that only emits tracing events.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Append one line.
    pub fn record(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!("{}", message);

        if let Some(path) = &self.path {
            if let Err(e) = append_line(path, message) {
                tracing::warn!("Failed to append to activity log {}: {}", path, e);
            }
        }
    }

    /// Append one line for a caught error.
    pub fn record_failure(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::warn!("{}", message);

        if let Some(path) = &self.path {
            if let Err(e) = append_line(path, message) {
                tracing::warn!("Failed to append to activity log {}: {}", path, e);
            }
        }
    }
}

fn append_line(path: &Utf8Path, message: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(
        file,
        "{} - {}",
        Local::now().format(LINE_TIMESTAMP_FORMAT),
        message
    )
}
