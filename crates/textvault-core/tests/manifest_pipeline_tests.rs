//! Integration tests: processing, collection and validation over a data root

use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;
use textvault_core::manifest::{read_record_manifest, write_manifest};
use textvault_core::schema::{FILE_INFO_SCHEMA, PROCESSED_DATA_SCHEMA};
use textvault_core::seed::seed_samples;
use textvault_core::walk::regular_files;
use textvault_core::{
    ActivityLog, DataLayout, MetadataCollector, ProcessingPipeline, SchemaValidator,
};

fn create_layout() -> (DataLayout, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp_dir.path().join("project_root")).unwrap();
    let layout = DataLayout::new(root);
    layout.ensure().unwrap();
    (layout, temp_dir)
}

#[test]
fn test_processed_tree_metadata_matches_example() {
    let (layout, _temp) = create_layout();
    let log = ActivityLog::new(layout.log_file());
    let source = layout.raw_dir().join("a.txt");
    fs::write(&source, "Hello, World!").unwrap();

    let pipeline = ProcessingPipeline::new(
        layout.raw_dir(),
        layout.processed_dir(),
        "_processed",
        log.clone(),
    );
    let outcome = pipeline.process(&[source]);
    assert!(outcome.is_complete());

    let collector = MetadataCollector::new(layout.data_dir(), log.clone());
    let entries = collector
        .collect_to_manifest(&layout.processed_dir(), &layout.file_info_manifest())
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "a_processed.txt");
    assert_eq!(entries[0].path, "processed/a_processed.txt");
    assert_eq!(entries[0].byte_size, "hELLO, wORLD!".len() as u64);
    assert_eq!(entries[0].byte_size, outcome.records[0].byte_size);

    let validator = SchemaValidator::new().unwrap().with_log(log);
    let report = validator
        .validate_file(&layout.file_info_manifest(), FILE_INFO_SCHEMA)
        .unwrap();
    assert!(report.is_valid(), "{}", report.diagnostic());

    let log_content = fs::read_to_string(layout.log_file()).unwrap();
    assert!(log_content.contains("a_processed.txt"));
    assert!(log_content.contains("is valid according to the file-info schema"));
}

#[test]
fn test_empty_directory_manifest_validates() {
    let (layout, _temp) = create_layout();
    let collector = MetadataCollector::new(layout.data_dir(), ActivityLog::disabled());

    let entries = collector
        .collect_to_manifest(&layout.processed_dir(), &layout.file_info_manifest())
        .unwrap();
    assert!(entries.is_empty());

    let report = SchemaValidator::new()
        .unwrap()
        .validate_file(&layout.file_info_manifest(), FILE_INFO_SCHEMA)
        .unwrap();
    assert!(report.is_valid());
}

#[test]
fn test_seeded_samples_round_trip_through_pipeline() {
    let (layout, _temp) = create_layout();
    let log = ActivityLog::disabled();
    seed_samples(&layout.raw_dir(), &log).unwrap();

    let sources = regular_files(&layout.raw_dir()).unwrap();
    let outcome = ProcessingPipeline::new(
        layout.raw_dir(),
        layout.processed_dir(),
        "_processed",
        log,
    )
    .process(&sources);

    assert!(outcome.is_complete());
    assert_eq!(outcome.records.len(), 5);

    let manifest = layout.processed_manifest();
    write_manifest(&manifest, &outcome.records).unwrap();
    assert_eq!(read_record_manifest(&manifest).unwrap(), outcome.records);

    let report = SchemaValidator::new()
        .unwrap()
        .validate_file(&manifest, PROCESSED_DATA_SCHEMA)
        .unwrap();
    assert!(report.is_valid(), "{}", report.diagnostic());

    let mut transformed: Vec<&str> = outcome
        .records
        .iter()
        .map(|r| r.transformed_text.as_str())
        .collect();
    transformed.sort_unstable();
    assert_eq!(
        transformed,
        [
            "hELLO, wORLD",
            "hELLO, wORLD!",
            "hOLA MUNDO!",
            "¡hOLA MUNDO!",
            "пРИВЕТ, МИР!",
        ]
    );
}

#[test]
fn test_manifest_missing_field_fails_with_diagnostic() {
    let (layout, _temp) = create_layout();
    let manifest = layout.file_info_manifest();
    fs::write(
        &manifest,
        r#"[{"name": "a.txt", "path": "processed/a.txt",
             "created_at": "2024-01-01T00:00:00Z", "modified_at": "2024-01-01T00:00:00Z"}]"#,
    )
    .unwrap();

    let report = SchemaValidator::new()
        .unwrap()
        .validate_file(&manifest, FILE_INFO_SCHEMA)
        .unwrap();

    assert!(!report.is_valid());
    assert!(report.diagnostic().contains("byte_size"));
}
