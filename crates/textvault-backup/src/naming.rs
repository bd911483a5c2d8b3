//! Dated archive names and collision handling

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use textvault_core::CollisionPolicy;

/// Prefix of every archive file name.
pub const ARCHIVE_PREFIX: &str = "backup_";

/// Extension of every archive file name.
pub const ARCHIVE_EXTENSION: &str = ".tar.gz";

const DATE_FORMAT: &str = "%Y%m%d";

/// `backup_YYYYMMDD.tar.gz`, or `backup_YYYYMMDD_N.tar.gz` for version `N > 0`.
pub fn archive_file_name(date: NaiveDate, version: u32) -> String {
    if version == 0 {
        format!("{}{}{}", ARCHIVE_PREFIX, date.format(DATE_FORMAT), ARCHIVE_EXTENSION)
    } else {
        format!(
            "{}{}_{}{}",
            ARCHIVE_PREFIX,
            date.format(DATE_FORMAT),
            version,
            ARCHIVE_EXTENSION
        )
    }
}

/// Where today's archive goes under `dir`, honoring the collision policy.
pub fn resolve_archive_path(dir: &Utf8Path, date: NaiveDate, policy: CollisionPolicy) -> Utf8PathBuf {
    match policy {
        CollisionPolicy::Overwrite => dir.join(archive_file_name(date, 0)),
        CollisionPolicy::Version => {
            let mut version = 0;
            loop {
                let candidate = dir.join(archive_file_name(date, version));
                if !candidate.exists() {
                    return candidate;
                }
                version += 1;
            }
        }
    }
}

/// Date encoded in an archive file name, if it follows the naming scheme.
pub fn parse_archive_date(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name
        .strip_prefix(ARCHIVE_PREFIX)?
        .strip_suffix(ARCHIVE_EXTENSION)?;
    let date = match stem.split_once('_') {
        Some((date, version)) => {
            version.parse::<u32>().ok()?;
            date
        }
        None => stem,
    };
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}
