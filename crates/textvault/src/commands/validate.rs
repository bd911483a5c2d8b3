//! Validate command

use anyhow::{bail, Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use textvault_core::schema::FILE_INFO_SCHEMA;
use textvault_core::{SchemaValidator, ValidationReport};

use super::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Manifest file to validate
    pub manifest: Utf8PathBuf,

    /// Schema name (file-info, processed-data, textvault, or one from --schema-dir)
    #[arg(long, default_value = FILE_INFO_SCHEMA)]
    pub schema: String,

    /// Load `<name>.schema.json` files from this directory instead of the embedded set
    #[arg(long)]
    pub schema_dir: Option<Utf8PathBuf>,
}

pub fn run(args: ValidateArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = Context::load(config)?;
    output::header("Validate Manifest");
    output::kv("Manifest", args.manifest.as_str());
    output::kv("Schema", &args.schema);

    let custom;
    let validator = match &args.schema_dir {
        Some(dir) => {
            output::kv("Schema dir", dir.as_str());
            custom = load_schema_dir(&ctx, dir)?;
            &custom
        }
        None => &ctx.validator,
    };

    let report = check(validator, &args.manifest, &args.schema)?;
    if report.is_valid() {
        output::success(&format!("{} is valid", args.manifest));
        Ok(())
    } else {
        output::error(&format!("{} is invalid", args.manifest));
        eprintln!("{}", report.diagnostic());
        bail!(
            "{} violation(s) against the {} schema",
            report.violations.len(),
            args.schema
        )
    }
}

/// Validate `manifest` against an embedded schema. A failing manifest is a
/// report, not an error.
pub fn validate(ctx: &Context, manifest: &Utf8Path, schema: &str) -> Result<ValidationReport> {
    check(&ctx.validator, manifest, schema)
}

/// Validator over the schemas in `dir`, logging to the context's activity log.
fn load_schema_dir(ctx: &Context, dir: &Utf8Path) -> Result<SchemaValidator> {
    let validator = SchemaValidator::from_directory(dir)
        .with_context(|| format!("Failed to load schemas from {}", dir))?;
    Ok(validator.with_log(ctx.log.clone()))
}

fn check(validator: &SchemaValidator, manifest: &Utf8Path, schema: &str) -> Result<ValidationReport> {
    if !validator.has_schema(schema) {
        bail!(
            "Unknown schema '{}'; available: {}",
            schema,
            validator.list_schemas().join(", ")
        );
    }
    validator
        .validate_file(manifest, schema)
        .with_context(|| format!("Failed to validate {}", manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{bare_context, temp_context};
    use std::fs;

    #[test]
    fn test_invalid_manifest_is_reported_not_raised() {
        let (ctx, _temp) = temp_context();
        let manifest = ctx.layout.file_info_manifest();
        fs::write(&manifest, r#"[{"name": "a.txt"}]"#).unwrap();

        let report = validate(&ctx, &manifest, FILE_INFO_SCHEMA).unwrap();
        assert!(!report.is_valid());
    }

    #[test]
    fn test_unknown_schema_lists_available() {
        let (ctx, _temp) = temp_context();
        let manifest = ctx.layout.file_info_manifest();
        fs::write(&manifest, "[]").unwrap();

        let err = validate(&ctx, &manifest, "no-such-schema").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("no-such-schema"));
        assert!(msg.contains("file-info"));
        assert!(msg.contains("processed-data"));
    }

    #[test]
    fn test_validate_does_not_create_layout() {
        let (ctx, temp) = bare_context();
        let manifest = Utf8PathBuf::from_path_buf(temp.path().join("file_info.json")).unwrap();
        fs::write(&manifest, "[]").unwrap();

        let report = validate(&ctx, &manifest, FILE_INFO_SCHEMA).unwrap();

        assert!(report.is_valid());
        assert!(!ctx.layout.root().exists());
    }

    #[test]
    fn test_schema_dir_replaces_embedded_schemas() {
        let (ctx, temp) = temp_context();
        let dir = Utf8PathBuf::from_path_buf(temp.path().join("schemas")).unwrap();
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("note.schema.json"),
            r#"{
                "$schema": "http://json-schema.org/draft-07/schema#",
                "type": "object",
                "required": ["title"],
                "properties": { "title": { "type": "string" } }
            }"#,
        )
        .unwrap();
        let good = dir.join("good.json");
        let bad = dir.join("bad.json");
        fs::write(&good, r#"{"title": "x"}"#).unwrap();
        fs::write(&bad, "{}").unwrap();

        let validator = load_schema_dir(&ctx, &dir).unwrap();

        assert!(check(&validator, &good, "note").unwrap().is_valid());
        assert!(!check(&validator, &bad, "note").unwrap().is_valid());
        assert!(check(&validator, &good, FILE_INFO_SCHEMA).is_err());
    }

    #[test]
    fn test_schema_dir_without_schemas_is_an_error() {
        let (ctx, temp) = temp_context();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();

        assert!(load_schema_dir(&ctx, &dir).is_err());
    }
}
