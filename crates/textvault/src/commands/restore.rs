//! Restore command

use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use textvault_backup::{ArchiveHandle, ArchiveManager, RestoreSummary};

use super::{absolute, Context};
use crate::output;

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Archive to restore from
    pub archive: Utf8PathBuf,

    /// Destination directory (defaults to the data directory)
    #[arg(short, long)]
    pub dest: Option<Utf8PathBuf>,
}

pub async fn run(args: RestoreArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = Context::load_writable(config)?;
    output::header("Restore Data");

    let handle = ArchiveManager::open(&absolute(&args.archive)?)
        .with_context(|| format!("Failed to open {}", args.archive))?;
    let destination = match args.dest {
        Some(dest) => absolute(&dest)?,
        None => ctx.layout.data_dir(),
    };

    output::kv("Archive", handle.path.as_str());
    output::kv("Files", &handle.entry_count.to_string());
    output::kv("Destination", destination.as_str());
    println!();

    let spinner = output::spinner("Restoring archive...");
    let result = restore(&ctx, &handle, &destination).await;
    spinner.finish_and_clear();

    let summary = result?;
    output::success(&format!(
        "Restored {} files in {:.2}s",
        summary.restored,
        summary.duration.as_secs_f64()
    ));
    Ok(())
}

/// Extract the archive behind `handle` into `destination`.
pub async fn restore(ctx: &Context, handle: &ArchiveHandle, destination: &Utf8Path) -> Result<RestoreSummary> {
    ctx.archive_manager()
        .restore_archive(handle, destination)
        .await
        .with_context(|| format!("Failed to restore {}", handle.path))
}
