//! Collect command

use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use textvault_core::{FileMetadata, MetadataCollector};

use super::{absolute, Context};
use crate::output;

#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Directory to describe (defaults to data/processed)
    #[arg(long)]
    pub dir: Option<Utf8PathBuf>,

    /// Manifest to write (defaults to output/file_info.json)
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,
}

pub fn run(args: CollectArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = Context::load_writable(config)?;
    output::header("Collect File Metadata");

    let dir = match args.dir {
        Some(dir) => absolute(&dir)?,
        None => ctx.layout.processed_dir(),
    };
    let manifest = args
        .output
        .unwrap_or_else(|| ctx.layout.file_info_manifest());

    let entries = collect(&ctx, &dir, &manifest)?;
    for entry in &entries {
        output::kv(&entry.path, &output::format_bytes(entry.byte_size));
    }
    output::success(&format!("{} entries written to {}", entries.len(), manifest));
    Ok(())
}

/// Describe every file under `dir`, paths relative to the data directory.
pub fn collect(ctx: &Context, dir: &Utf8Path, manifest: &Utf8Path) -> Result<Vec<FileMetadata>> {
    MetadataCollector::new(ctx.layout.data_dir(), ctx.log.clone())
        .collect_to_manifest(dir, manifest)
        .with_context(|| format!("Failed to collect metadata for {}", dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::temp_context;
    use std::fs;
    use textvault_core::manifest::read_metadata_manifest;

    #[test]
    fn test_collect_uses_data_relative_paths() {
        let (ctx, _temp) = temp_context();
        fs::write(ctx.layout.processed_dir().join("a_processed.txt"), "hELLO").unwrap();

        let manifest = ctx.layout.file_info_manifest();
        let entries = collect(&ctx, &ctx.layout.processed_dir(), &manifest).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "processed/a_processed.txt");
        assert_eq!(read_metadata_manifest(&manifest).unwrap(), entries);
    }

    #[test]
    fn test_collect_outside_data_dir_fails() {
        let (ctx, _temp) = temp_context();
        let err = collect(&ctx, &ctx.layout.output_dir(), &ctx.layout.file_info_manifest())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to collect metadata"));
    }
}
