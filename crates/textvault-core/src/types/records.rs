//! Per-file records written to the processed-data and file-info manifests

use crate::encoding::TextEncoding;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One processed file, as captured by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// File name of the written output
    pub name: String,

    /// Decoded source text
    pub original_text: String,

    /// Case-inverted text that was written
    pub transformed_text: String,

    /// Size of the written output in bytes
    pub byte_size: u64,

    /// Modification time of the written output
    pub modified_at: DateTime<Utc>,

    /// Encoding used both to decode the source and to write the output
    pub encoding: TextEncoding,
}

/// File-system attributes of one file, read fresh at collection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// File name
    pub name: String,

    /// `/`-separated path relative to the collector's root
    pub path: String,

    /// Size in bytes
    pub byte_size: u64,

    /// Creation time, or inode change time where the platform has no birth time
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub modified_at: DateTime<Utc>,
}
