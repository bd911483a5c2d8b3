//! Detect, decode, transform, re-encode and persist a batch of text files
//!
//! Each source file is read, its encoding guessed, its text case-inverted,
//! and the result written in the *same* encoding to a mirrored location
//! under the destination root, with a suffix marking it as derived.
//!
//! A failure on one file never aborts the batch: the file is skipped, logged
//! with its name and the failing stage, and reported in
//! [`ProcessOutcome::failures`]. Skipped files do not appear in the manifest.

use crate::activity::ActivityLog;
use crate::encoding::{EncodingDetector, HeuristicDetector};
use crate::error::{Error, Result};
use crate::transform::swap_case;
use crate::types::FileRecord;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use std::fmt;
use std::fs;

/// Step of the per-file pipeline, reported alongside failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Read,
    Detect,
    Decode,
    Encode,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolve => "resolve",
            Stage::Read => "read",
            Stage::Detect => "detect",
            Stage::Decode => "decode",
            Stage::Encode => "encode",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// A source file that was skipped.
#[derive(Debug)]
pub struct FileFailure {
    pub source: Utf8PathBuf,
    pub stage: Stage,
    pub error: Error,
}

/// Result of processing a batch.
#[derive(Debug, Default)]
pub struct ProcessOutcome {
    /// Records for the files that were written, in input order
    pub records: Vec<FileRecord>,

    /// Files that were skipped, in input order
    pub failures: Vec<FileFailure>,
}

impl ProcessOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Per-file processing pipeline.
pub struct ProcessingPipeline {
    detector: Box<dyn EncodingDetector>,
    source_root: Utf8PathBuf,
    dest_root: Utf8PathBuf,
    suffix: String,
    log: ActivityLog,
}

impl ProcessingPipeline {
    /// Pipeline mirroring `source_root` into `dest_root` with the heuristic detector.
    pub fn new(
        source_root: impl Into<Utf8PathBuf>,
        dest_root: impl Into<Utf8PathBuf>,
        suffix: impl Into<String>,
        log: ActivityLog,
    ) -> Self {
        Self {
            detector: Box::new(HeuristicDetector),
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            suffix: suffix.into(),
            log,
        }
    }

    /// Substitute the encoding detector.
    pub fn with_detector(mut self, detector: impl EncodingDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Process `sources` sequentially, in order.
    pub fn process(&self, sources: &[Utf8PathBuf]) -> ProcessOutcome {
        let mut outcome = ProcessOutcome::default();

        for source in sources {
            match self.process_file(source) {
                Ok(record) => outcome.records.push(record),
                Err((stage, error)) => {
                    self.log.record_failure(format!(
                        "Skipped '{}' at {} stage: {}",
                        source, stage, error
                    ));
                    outcome.failures.push(FileFailure {
                        source: source.clone(),
                        stage,
                        error,
                    });
                }
            }
        }

        self.log.record(format!(
            "File processing completed: {} written, {} skipped",
            outcome.records.len(),
            outcome.failures.len()
        ));
        outcome
    }

    fn process_file(&self, source: &Utf8Path) -> std::result::Result<FileRecord, (Stage, Error)> {
        let name = source.file_name().unwrap_or(source.as_str());

        let relative = source
            .strip_prefix(&self.source_root)
            .map_err(|_| {
                (
                    Stage::Resolve,
                    Error::outside_root(source.as_str(), self.source_root.as_str()),
                )
            })?;
        let destination = self.destination_for(relative).map_err(|e| (Stage::Resolve, e))?;

        let raw = fs::read(source).map_err(|e| (Stage::Read, Error::Io(e)))?;

        let guess = self
            .detector
            .guess(&raw)
            .ok_or_else(|| (Stage::Detect, Error::encoding(name)))?;
        tracing::debug!(
            "Detected {} for {} (confidence {:.2})",
            guess.encoding,
            source,
            guess.confidence
        );

        let encoding = guess.encoding;
        let original_text = encoding
            .decode(&raw)
            .ok_or_else(|| (Stage::Decode, Error::decode(name, encoding.label())))?
            .into_owned();

        let transformed_text = swap_case(&original_text);

        let encoded = encoding
            .encode(&transformed_text)
            .ok_or_else(|| (Stage::Encode, Error::encode(name, encoding.label())))?;

        let (byte_size, modified_at) =
            write_output(&destination, &encoded).map_err(|e| (Stage::Write, Error::Io(e)))?;

        self.log.record(format!(
            "Processed '{}' -> '{}' ({}, confidence {:.2}): {}",
            source, destination, encoding, guess.confidence, transformed_text
        ));

        Ok(FileRecord {
            name: destination.file_name().unwrap_or_default().to_string(),
            original_text,
            transformed_text,
            byte_size,
            modified_at,
            encoding,
        })
    }

    /// Mirrored output location for a path relative to the source root.
    fn destination_for(&self, relative: &Utf8Path) -> Result<Utf8PathBuf> {
        let file_name = relative
            .file_name()
            .ok_or_else(|| Error::outside_root(relative.as_str(), self.source_root.as_str()))?;
        let derived = derived_file_name(file_name, &self.suffix);

        Ok(match relative.parent() {
            Some(parent) => self.dest_root.join(parent).join(derived),
            None => self.dest_root.join(derived),
        })
    }
}

/// `a.txt` becomes `a<suffix>.txt`; names without an extension get the suffix appended.
pub fn derived_file_name(file_name: &str, suffix: &str) -> String {
    let path = Utf8Path::new(file_name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(extension)) => format!("{}{}.{}", stem, suffix, extension),
        _ => format!("{}{}", file_name, suffix),
    }
}

fn write_output(destination: &Utf8Path, bytes: &[u8]) -> std::io::Result<(u64, DateTime<Utc>)> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(destination, bytes)?;

    let metadata = fs::metadata(destination)?;
    Ok((metadata.len(), DateTime::<Utc>::from(metadata.modified()?)))
}
