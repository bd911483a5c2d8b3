//! Seed command

use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use textvault_core::seed::seed_samples;

use super::Context;
use crate::output;

pub fn run(config: Option<&Utf8Path>) -> Result<()> {
    let ctx = Context::load_writable(config)?;
    output::header("Seed Sample Files");

    let written = seed(&ctx)?;
    for path in &written {
        output::success(path.as_str());
    }
    output::info(&format!("{} sample files in {}", written.len(), ctx.layout.raw_dir()));
    Ok(())
}

pub fn seed(ctx: &Context) -> Result<Vec<Utf8PathBuf>> {
    let raw_dir = ctx.layout.raw_dir();
    seed_samples(&raw_dir, &ctx.log).with_context(|| format!("Failed to seed {}", raw_dir))
}
