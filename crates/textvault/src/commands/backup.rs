//! Backup command

use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use textvault_backup::ArchiveHandle;

use super::{absolute, Context};
use crate::output;

#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Tree to archive (defaults to the data directory)
    #[arg(long)]
    pub source: Option<Utf8PathBuf>,

    /// Compression level (1-9), overriding the configuration
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=9))]
    pub compression: Option<u32>,
}

pub async fn run(args: BackupArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = Context::load_writable(config)?;
    output::header("Back Up Data");

    let source = match args.source {
        Some(source) => absolute(&source)?,
        None => ctx.layout.data_dir(),
    };
    output::kv("Source", source.as_str());
    output::kv("Backups", ctx.layout.backups_dir().as_str());
    println!();

    let spinner = output::spinner("Creating archive...");
    let result = backup(&ctx, &source, args.compression).await;
    spinner.finish_and_clear();

    let handle = result?;
    print_handle(&handle);
    output::success("Backup created");
    Ok(())
}

/// Archive `source` into the backups directory.
pub async fn backup(ctx: &Context, source: &Utf8Path, compression: Option<u32>) -> Result<ArchiveHandle> {
    let mut manager = ctx.archive_manager();
    if let Some(level) = compression {
        manager = manager.with_compression_level(level);
    }
    manager
        .create_archive(source)
        .await
        .with_context(|| format!("Failed to back up {}", source))
}

pub fn print_handle(handle: &ArchiveHandle) {
    output::kv("Archive", handle.path.as_str());
    output::kv("Files", &handle.entry_count.to_string());
    output::kv("Size", &output::format_bytes(handle.size_bytes));
    output::kv("SHA-256", &handle.checksum);
}
