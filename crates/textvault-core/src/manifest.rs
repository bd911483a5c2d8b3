//! Manifest persistence
//!
//! A manifest is a pretty-printed UTF-8 JSON array. Each run overwrites the
//! previous file; there is no locking across runs.

use crate::error::{Error, Result};
use crate::types::{FileMetadata, FileRecord};
use camino::Utf8Path;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;

/// Write `items` to `path` in order, replacing any previous manifest.
pub fn write_manifest<T: Serialize>(path: &Utf8Path, items: &[T]) -> Result<()> {
    let json =
        serde_json::to_string_pretty(items).map_err(|e| Error::manifest_format(path.as_str(), e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::manifest_io(parent.as_str(), e))?;
        }
    }

    fs::write(path, json + "\n").map_err(|e| Error::manifest_io(path.as_str(), e))?;
    tracing::debug!("Wrote {} manifest entries to {}", items.len(), path);
    Ok(())
}

/// Read a manifest as raw JSON, for validation. Any JSON document is
/// accepted; the schema decides whether it has the right shape.
pub fn read_manifest_value(path: &Utf8Path) -> Result<serde_json::Value> {
    read_json(path)
}

/// Deserialize a file-info manifest.
pub fn read_metadata_manifest(path: &Utf8Path) -> Result<Vec<FileMetadata>> {
    read_json(path)
}

/// Deserialize a processed-data manifest.
pub fn read_record_manifest(path: &Utf8Path) -> Result<Vec<FileRecord>> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::manifest_io(path.as_str(), e))?;
    serde_json::from_str(&content).map_err(|e| Error::manifest_format(path.as_str(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn manifest_path(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp_dir.path().join("output/file_info.json")).unwrap()
    }

    #[test]
    fn test_manifest_is_indented_and_ordered() {
        let temp_dir = TempDir::new().unwrap();
        let path = manifest_path(&temp_dir);
        let stamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let entries = vec![
            FileMetadata {
                name: "z.txt".to_string(),
                path: "processed/z.txt".to_string(),
                byte_size: 1,
                created_at: stamp,
                modified_at: stamp,
            },
            FileMetadata {
                name: "a.txt".to_string(),
                path: "processed/a.txt".to_string(),
                byte_size: 2,
                created_at: stamp,
                modified_at: stamp,
            },
        ];

        write_manifest(&path, &entries).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n  {"));
        assert_eq!(read_metadata_manifest(&path).unwrap(), entries);
    }

    #[test]
    fn test_unicode_is_written_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let path = manifest_path(&temp_dir);
        write_manifest(&path, &["Привет"]).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("Привет"));
    }

    #[test]
    fn test_missing_manifest_is_manifest_io() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_manifest_value(&manifest_path(&temp_dir)).unwrap_err();
        assert!(matches!(err, Error::ManifestIo { .. }));
    }

    #[test]
    fn test_malformed_manifest_is_manifest_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = manifest_path(&temp_dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[{").unwrap();

        let err = read_metadata_manifest(&path).unwrap_err();
        assert!(matches!(err, Error::ManifestFormat { .. }));
    }

    #[test]
    fn test_non_array_reads_as_value_but_not_as_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = manifest_path(&temp_dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"name": "a.txt"}"#).unwrap();

        let value = read_manifest_value(&path).unwrap();
        assert_eq!(value["name"], "a.txt");

        let err = read_record_manifest(&path).unwrap_err();
        assert!(matches!(err, Error::ManifestFormat { .. }));
    }
}
