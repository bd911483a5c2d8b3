//! Value types persisted to manifests

pub mod records;

pub use records::{FileMetadata, FileRecord};
