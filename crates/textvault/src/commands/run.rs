//! Run command: the whole pipeline in one go
//!
//! Steps run in order and a failing step does not stop later ones, except
//! where a later step needs the earlier step's output. Every step ends up
//! as a task in `output/report.json` and `output/report.txt`.

use anyhow::{bail, Result};
use camino::Utf8Path;
use chrono::Local;
use clap::Args;
use textvault_core::report::{ReportBuilder, RunReport, TaskStatus};
use textvault_core::schema::{FILE_INFO_SCHEMA, PROCESSED_DATA_SCHEMA};

use super::{backup, collect, process, restore, seed, validate, Context};
use crate::output;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Write the sample input files before processing
    #[arg(long)]
    pub seed: bool,

    /// Restore the data tree from the archive just created
    #[arg(long)]
    pub restore: bool,
}

pub async fn run(args: RunArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = Context::load_writable(config)?;
    output::header("Textvault Run");
    output::kv("Root", ctx.layout.root().as_str());
    println!();

    let report = execute(&ctx, &args).await?;

    for task in &report.tasks {
        let line = format!("{}: {}", task.task, task.details);
        match task.status {
            TaskStatus::Completed => output::success(&line),
            TaskStatus::Failed => output::error(&line),
            TaskStatus::Skipped => output::info(&line),
        }
    }
    output::kv("Elapsed", &report.elapsed_time);
    output::kv("Report", ctx.layout.output_dir().join("report.json").as_str());

    if report.has_failures() {
        bail!("{}", report.conclusions);
    }
    Ok(())
}

/// Run every step, write the report and return it.
pub async fn execute(ctx: &Context, args: &RunArgs) -> Result<RunReport> {
    let mut report = ReportBuilder::start(Local::now());
    ctx.log.record("Project structure created");
    report.task(
        "Create project structure",
        TaskStatus::Completed,
        format!("Directories created under {}.", ctx.layout.root()),
    );

    if args.seed {
        match seed::seed(ctx) {
            Ok(files) => report.task(
                "Create sample files",
                TaskStatus::Completed,
                format!("{} files written to {}.", files.len(), ctx.layout.raw_dir()),
            ),
            Err(e) => report.task("Create sample files", TaskStatus::Failed, format!("{:#}", e)),
        }
    } else {
        report.task("Create sample files", TaskStatus::Skipped, "Not requested.");
    }

    let processed = match process::process(ctx, &ctx.layout.raw_dir()) {
        Ok(outcome) => {
            let status = if outcome.is_complete() {
                TaskStatus::Completed
            } else {
                TaskStatus::Failed
            };
            report.task(
                "Process files",
                status,
                format!(
                    "{} processed, {} skipped; serialized to {}.",
                    outcome.records.len(),
                    outcome.failures.len(),
                    ctx.layout.processed_manifest()
                ),
            );
            true
        }
        Err(e) => {
            report.task("Process files", TaskStatus::Failed, format!("{:#}", e));
            false
        }
    };

    let collected = match collect::collect(
        ctx,
        &ctx.layout.processed_dir(),
        &ctx.layout.file_info_manifest(),
    ) {
        Ok(entries) => {
            report.task(
                "Collect file info",
                TaskStatus::Completed,
                format!(
                    "{} entries serialized to {}.",
                    entries.len(),
                    ctx.layout.file_info_manifest()
                ),
            );
            true
        }
        Err(e) => {
            report.task("Collect file info", TaskStatus::Failed, format!("{:#}", e));
            false
        }
    };

    let mut checks = Vec::new();
    if processed {
        checks.push((ctx.layout.processed_manifest(), PROCESSED_DATA_SCHEMA));
    }
    if collected {
        checks.push((ctx.layout.file_info_manifest(), FILE_INFO_SCHEMA));
    }
    if checks.is_empty() {
        report.task("Validate JSON", TaskStatus::Skipped, "No manifests were written.");
    }
    for (manifest, schema) in checks {
        let task = format!("Validate JSON ({})", schema);
        match validate::validate(ctx, &manifest, schema) {
            Ok(result) if result.is_valid() => {
                report.task(task, TaskStatus::Completed, format!("{} is valid.", manifest))
            }
            Ok(result) => report.task(task, TaskStatus::Failed, result.diagnostic()),
            Err(e) => report.task(task, TaskStatus::Failed, format!("{:#}", e)),
        }
    }

    let handle = match backup::backup(ctx, &ctx.layout.data_dir(), None).await {
        Ok(handle) => {
            report.task(
                "Create backup",
                TaskStatus::Completed,
                format!("{} ({} files).", handle.path, handle.entry_count),
            );
            Some(handle)
        }
        Err(e) => {
            report.task("Create backup", TaskStatus::Failed, format!("{:#}", e));
            None
        }
    };

    match (args.restore, handle) {
        (false, _) => report.task("Restore backup", TaskStatus::Skipped, "Not requested."),
        (true, None) => report.task(
            "Restore backup",
            TaskStatus::Skipped,
            "No archive was created in this run.",
        ),
        (true, Some(handle)) => {
            match restore::restore(ctx, &handle, &ctx.layout.data_dir()).await {
                Ok(summary) => report.task(
                    "Restore backup",
                    TaskStatus::Completed,
                    format!("{} files restored from {}.", summary.restored, handle.file_name()),
                ),
                Err(e) => report.task("Restore backup", TaskStatus::Failed, format!("{:#}", e)),
            }
        }
    }

    let report = report.finish(Local::now());
    let (json_path, txt_path) = report.write(&ctx.layout.output_dir())?;
    ctx.log.record(format!(
        "Report generated and saved to {} and {}",
        json_path, txt_path
    ));

    if report.has_failures() {
        ctx.log.record_failure(&report.conclusions);
    } else {
        ctx.log.record("All steps completed successfully.");
    }
    Ok(report)
}
