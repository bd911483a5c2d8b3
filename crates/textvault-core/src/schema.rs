//! JSON Schema validation for manifests and configuration
//!
//! A manifest that does not satisfy its schema is not an error: validation
//! returns a [`ValidationReport`] listing every violation. Errors are kept
//! for problems with the schema itself ([`Error::Schema`]) and for manifests
//! that cannot be read ([`Error::ManifestIo`], [`Error::ManifestFormat`]).

use crate::activity::ActivityLog;
use crate::error::{Error, Result};
use crate::manifest::read_manifest_value;
use camino::Utf8Path;
use jsonschema::Validator;
use rust_embed::RustEmbed;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Schema for `file_info.json`
pub const FILE_INFO_SCHEMA: &str = "file-info";

/// Schema for `processed_data.json`
pub const PROCESSED_DATA_SCHEMA: &str = "processed-data";

/// Embedded schema files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../schemas/"]
#[prefix = ""]
struct EmbeddedSchemas;

/// One failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending element, e.g. `/0`
    pub instance_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  - {}", self.message)
        } else {
            write!(f, "  - {}: {}", self.instance_path, self.message)
        }
    }
}

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub schema: String,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable list of every violation, one per line.
    pub fn diagnostic(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Schema validator with pre-compiled schemas
#[derive(Debug)]
pub struct SchemaValidator {
    /// Compiled schemas by name
    schemas: HashMap<String, Validator>,
    log: ActivityLog,
}

impl SchemaValidator {
    /// Create a new schema validator with the embedded schemas
    pub fn new() -> Result<Self> {
        let mut validator = Self::empty();

        for file in EmbeddedSchemas::iter() {
            if let Some(name) = file.strip_suffix(".schema.json") {
                debug!("Loading embedded schema: {}", name);

                if let Some(content) = EmbeddedSchemas::get(&file) {
                    let schema_value: Value = serde_json::from_slice(&content.data)
                        .map_err(|e| Error::schema(name, e.to_string()))?;
                    validator.add_schema(name, &schema_value)?;
                }
            }
        }

        if validator.schemas.is_empty() {
            return Err(Error::schema_not_found("no embedded schemas"));
        }

        Ok(validator)
    }

    /// Load from an external schema directory
    pub fn from_directory(path: &Utf8Path) -> Result<Self> {
        let mut validator = Self::empty();

        if path.is_dir() {
            for entry in path.read_dir_utf8()? {
                let entry = entry?;
                let file_path = entry.path();

                if let Some(name) = entry.file_name().strip_suffix(".schema.json") {
                    debug!("Loading schema from file: {}", file_path);

                    let content = std::fs::read_to_string(file_path)?;
                    let schema_value: Value = serde_json::from_str(&content)
                        .map_err(|e| Error::schema(name, e.to_string()))?;
                    validator.add_schema(name, &schema_value)?;
                }
            }
        }

        if validator.schemas.is_empty() {
            return Err(Error::schema_not_found(format!("No schemas found in {}", path)));
        }

        Ok(validator)
    }

    fn empty() -> Self {
        Self {
            schemas: HashMap::new(),
            log: ActivityLog::disabled(),
        }
    }

    /// Record validation outcomes in `log`.
    pub fn with_log(mut self, log: ActivityLog) -> Self {
        self.log = log;
        self
    }

    /// Compile and register a schema, replacing any schema with the same name.
    ///
    /// Fails with [`Error::Schema`] if the document is not a valid JSON Schema
    /// or requires properties it never declares.
    pub fn add_schema(&mut self, name: &str, schema: &Value) -> Result<()> {
        check_required_declared(schema, "").map_err(|message| Error::schema(name, message))?;

        let compiled = jsonschema::options()
            .should_validate_formats(true)
            .build(schema)
            .map_err(|e| Error::schema(name, e.to_string()))?;

        self.schemas.insert(name.to_string(), compiled);
        Ok(())
    }

    /// Validate a JSON value against a schema
    pub fn validate(&self, value: &Value, schema_name: &str) -> Result<ValidationReport> {
        let schema = self
            .schemas
            .get(schema_name)
            .ok_or_else(|| Error::schema_not_found(schema_name))?;

        let violations = schema
            .iter_errors(value)
            .map(|e| Violation {
                instance_path: e.instance_path().to_string(),
                message: e.to_string(),
            })
            .collect();

        Ok(ValidationReport {
            schema: schema_name.to_string(),
            violations,
        })
    }

    /// Validate a manifest file against a schema
    pub fn validate_file(&self, path: &Utf8Path, schema_name: &str) -> Result<ValidationReport> {
        let value = read_manifest_value(path)?;
        let report = self.validate(&value, schema_name)?;

        if report.is_valid() {
            self.log.record(format!(
                "{} is valid according to the {} schema",
                path, schema_name
            ));
        } else {
            self.log.record_failure(format!(
                "{} failed {} schema validation:\n{}",
                path,
                schema_name,
                report.diagnostic()
            ));
        }

        Ok(report)
    }

    /// Check if a schema exists
    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// List available schemas
    pub fn list_schemas(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Every name listed in `required` must be declared in the sibling `properties`.
fn check_required_declared(schema: &Value, pointer: &str) -> std::result::Result<(), String> {
    let Some(object) = schema.as_object() else {
        return Ok(());
    };

    if let (Some(Value::Array(required)), Some(Value::Object(properties))) =
        (object.get("required"), object.get("properties"))
    {
        for name in required.iter().filter_map(Value::as_str) {
            if !properties.contains_key(name) {
                return Err(format!(
                    "{}/required lists \"{}\" which is not declared in properties",
                    pointer, name
                ));
            }
        }
    }

    for (key, child) in object {
        match child {
            Value::Object(_) => check_required_declared(child, &format!("{}/{}", pointer, key))?,
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    check_required_declared(item, &format!("{}/{}/{}", pointer, key, i))?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_entry() -> Value {
        json!({
            "name": "a_processed.txt",
            "path": "processed/a_processed.txt",
            "byte_size": 13,
            "created_at": "2024-06-01T12:00:00Z",
            "modified_at": "2024-06-01T11:59:00.123456789Z"
        })
    }

    #[test]
    fn test_validator_has_embedded_schemas() {
        let validator = SchemaValidator::new().unwrap();
        assert!(validator.has_schema(FILE_INFO_SCHEMA));
        assert!(validator.has_schema(PROCESSED_DATA_SCHEMA));
        assert!(validator.has_schema("textvault"));
    }

    #[test]
    fn test_empty_manifest_is_valid() {
        let validator = SchemaValidator::new().unwrap();
        let report = validator.validate(&json!([]), FILE_INFO_SCHEMA).unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn test_valid_entry_passes() {
        let validator = SchemaValidator::new().unwrap();
        let report = validator
            .validate(&json!([valid_entry()]), FILE_INFO_SCHEMA)
            .unwrap();
        assert!(report.is_valid(), "{}", report.diagnostic());
    }

    #[test]
    fn test_created_after_modified_is_not_a_violation() {
        let validator = SchemaValidator::new().unwrap();
        let mut entry = valid_entry();
        entry["created_at"] = json!("2030-01-01T00:00:00Z");
        let report = validator.validate(&json!([entry]), FILE_INFO_SCHEMA).unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn test_missing_field_is_named() {
        let validator = SchemaValidator::new().unwrap();
        let mut entry = valid_entry();
        entry.as_object_mut().unwrap().remove("byte_size");

        let report = validator.validate(&json!([entry]), FILE_INFO_SCHEMA).unwrap();

        assert!(!report.is_valid());
        assert_eq!(report.violations[0].instance_path, "/0");
        assert!(report.diagnostic().contains("byte_size"));
    }

    #[test]
    fn test_negative_size_fails() {
        let validator = SchemaValidator::new().unwrap();
        let mut entry = valid_entry();
        entry["byte_size"] = json!(-1);
        let report = validator.validate(&json!([entry]), FILE_INFO_SCHEMA).unwrap();
        assert!(!report.is_valid());
    }

    #[test]
    fn test_unrecognized_timestamp_fails() {
        let validator = SchemaValidator::new().unwrap();
        let mut entry = valid_entry();
        entry["modified_at"] = json!("yesterday");
        let report = validator.validate(&json!([entry]), FILE_INFO_SCHEMA).unwrap();
        assert!(!report.is_valid());
    }

    #[test]
    fn test_every_violation_is_reported() {
        let validator = SchemaValidator::new().unwrap();
        let mut second = valid_entry();
        second["byte_size"] = json!("big");
        let report = validator
            .validate(&json!([{}, second]), FILE_INFO_SCHEMA)
            .unwrap();

        assert!(report.violations.iter().any(|v| v.instance_path == "/0"));
        assert!(report.violations.iter().any(|v| v.instance_path == "/1/byte_size"));
    }

    #[test]
    fn test_non_array_document_fails() {
        let validator = SchemaValidator::new().unwrap();
        let report = validator.validate(&valid_entry(), FILE_INFO_SCHEMA).unwrap();
        assert!(!report.is_valid());
    }

    #[test]
    fn test_invalid_schema_is_schema_error() {
        let mut validator = SchemaValidator::new().unwrap();
        let err = validator
            .add_schema("broken", &json!({ "type": "no-such-type" }))
            .unwrap_err();
        assert!(matches!(err, Error::Schema { .. }), "got: {:?}", err);
    }

    #[test]
    fn test_inconsistent_required_is_schema_error() {
        let mut validator = SchemaValidator::new().unwrap();
        let schema = json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": { "name": { "type": "string" } },
                "required": ["name", "size"]
            }
        });

        let err = validator.add_schema("inconsistent", &schema).unwrap_err();
        assert!(err.to_string().contains("size"));
    }

    #[test]
    fn test_unknown_schema_name() {
        let validator = SchemaValidator::new().unwrap();
        let err = validator.validate(&json!([]), "nonexistent").unwrap_err();
        assert!(matches!(err, Error::SchemaNotFound { .. }));
    }

    #[test]
    fn test_from_directory_empty_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = camino::Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
        let result = SchemaValidator::from_directory(&path);
        assert!(matches!(result, Err(Error::SchemaNotFound { .. })));
    }
}
