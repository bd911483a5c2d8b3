//! Process command

use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use textvault_core::manifest::write_manifest;
use textvault_core::walk::regular_files;
use textvault_core::{ProcessOutcome, ProcessingPipeline};

use super::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Source directory (defaults to data/raw)
    #[arg(long)]
    pub source: Option<Utf8PathBuf>,
}

pub fn run(args: ProcessArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = Context::load_writable(config)?;
    output::header("Process Files");

    let source = args.source.unwrap_or_else(|| ctx.layout.raw_dir());
    let outcome = process(&ctx, &source)?;

    for record in &outcome.records {
        output::success(&format!("{} ({})", record.name, record.encoding));
    }
    for failure in &outcome.failures {
        output::warning(&format!(
            "Skipped {} at {}: {}",
            failure.source, failure.stage, failure.error
        ));
    }

    output::kv("Processed", &outcome.records.len().to_string());
    output::kv("Skipped", &outcome.failures.len().to_string());
    output::kv("Manifest", ctx.layout.processed_manifest().as_str());
    Ok(())
}

/// Process every file under `source` and write the processed-data manifest.
///
/// Skipped files are reported in the outcome, not as an error.
pub fn process(ctx: &Context, source: &Utf8Path) -> Result<ProcessOutcome> {
    let sources = regular_files(source).with_context(|| format!("Failed to list {}", source))?;

    let pipeline = ProcessingPipeline::new(
        source,
        ctx.layout.processed_dir(),
        ctx.config.processed_suffix(),
        ctx.log.clone(),
    );
    let outcome = pipeline.process(&sources);

    let manifest = ctx.layout.processed_manifest();
    write_manifest(&manifest, &outcome.records)
        .with_context(|| format!("Failed to write {}", manifest))?;
    ctx.log.record(format!(
        "Processed data serialized to {} ({} records)",
        manifest,
        outcome.records.len()
    ));

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::temp_context;
    use std::fs;
    use textvault_core::manifest::read_record_manifest;

    #[test]
    fn test_process_writes_outputs_and_manifest() {
        let (ctx, _temp) = temp_context();
        fs::write(ctx.layout.raw_dir().join("a.txt"), "Hello, World!").unwrap();
        fs::write(ctx.layout.raw_dir().join("bad.txt"), b"\x00\x01\x02").unwrap();

        let outcome = process(&ctx, &ctx.layout.raw_dir()).unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(
            fs::read_to_string(ctx.layout.processed_dir().join("a_processed.txt")).unwrap(),
            "hELLO, wORLD!"
        );
        let records = read_record_manifest(&ctx.layout.processed_manifest()).unwrap();
        assert_eq!(records, outcome.records);
    }
}
