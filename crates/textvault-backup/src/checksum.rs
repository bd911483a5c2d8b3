//! Archive integrity checksums

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

/// Calculates the hex SHA-256 of a file.
pub fn calculate_checksum(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_calculate_checksum() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.txt");
        std::fs::write(&path, b"Hello, World!").unwrap();

        let checksum = calculate_checksum(&path).unwrap();
        assert_eq!(
            checksum,
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );

        std::fs::write(&path, b"Hello, World?").unwrap();
        assert_ne!(calculate_checksum(&path).unwrap(), checksum);
    }

    #[test]
    fn test_missing_file() {
        assert!(calculate_checksum(Path::new("/nonexistent/archive.tar.gz")).is_err());
    }
}
