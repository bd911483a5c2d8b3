//! Directory traversal shared by metadata collection and archiving
//!
//! Recursive, regular files only, symlinks not followed, siblings visited in
//! file-name order so repeated walks over an unchanged tree agree.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

/// Regular files under `dir`, as paths joined onto `dir`.
pub fn regular_files(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let message = format!("Failed to walk {}: {}", dir, e);
            Error::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other(message)),
            )
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = Utf8PathBuf::from_path_buf(entry.into_path()).map_err(|p| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Path is not valid UTF-8: {}", p.display()),
            ))
        })?;
        files.push(path);
    }

    Ok(files)
}

/// `path` relative to `root`, `/`-separated regardless of platform.
pub fn relative_slash_path(path: &Utf8Path, root: &Utf8Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| Error::outside_root(path.as_str(), root.as_str()))?;

    Ok(relative
        .components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn utf8_root(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_walk_is_recursive_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_root(&temp_dir);
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("sub/c.txt"), "c").unwrap();

        let files: Vec<String> = regular_files(&root)
            .unwrap()
            .iter()
            .map(|p| relative_slash_path(p, &root).unwrap())
            .collect();

        assert_eq!(files, ["a.txt", "b.txt", "sub/c.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new().unwrap();
        let base = utf8_root(&temp_dir);
        let root = base.join("data");
        let outside = base.join("outside");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&outside).unwrap();
        fs::write(root.join("real.txt"), "real").unwrap();
        fs::write(outside.join("hidden.txt"), "hidden").unwrap();
        symlink(root.join("real.txt"), root.join("file_link.txt")).unwrap();
        symlink(&outside, root.join("dir_link")).unwrap();

        let files: Vec<String> = regular_files(&root)
            .unwrap()
            .iter()
            .map(|p| relative_slash_path(p, &root).unwrap())
            .collect();

        assert_eq!(files, ["real.txt"]);
    }

    #[test]
    fn test_empty_directory_has_no_files() {
        let temp_dir = TempDir::new().unwrap();
        assert!(regular_files(&utf8_root(&temp_dir)).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = utf8_root(&temp_dir).join("missing");
        assert!(regular_files(&missing).is_err());
    }

    #[test]
    fn test_relative_path_outside_root() {
        let err = relative_slash_path(Utf8Path::new("/elsewhere/a.txt"), Utf8Path::new("/data"))
            .unwrap_err();
        assert!(matches!(err, Error::OutsideRoot { .. }));
    }
}
