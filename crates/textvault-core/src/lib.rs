//! # textvault-core
//!
//! Core library for textvault providing:
//! - Encoding detection and strict decode/encode for ASCII, UTF-8 and Latin encodings
//! - Case-inverting text transform
//! - The detect → decode → transform → encode → persist pipeline
//! - File-system metadata collection and JSON manifests
//! - JSON Schema validation of manifests and configuration
//! - Configuration file parsing (textvault.yaml) and the data-root layout

pub mod activity;
pub mod collector;
pub mod config;
pub mod encoding;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod seed;
pub mod transform;
pub mod types;
pub mod walk;

pub use activity::ActivityLog;
pub use collector::MetadataCollector;
pub use config::{CollisionPolicy, ProjectConfig};
pub use encoding::{EncodingDetector, EncodingGuess, HeuristicDetector, TextEncoding};
pub use error::{Error, Result};
pub use layout::DataLayout;
pub use pipeline::{ProcessOutcome, ProcessingPipeline};
pub use schema::{SchemaValidator, ValidationReport};
pub use transform::swap_case;
pub use types::{FileMetadata, FileRecord};
