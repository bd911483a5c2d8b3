//! End-of-run report rendering

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;

const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskStatus {
    Completed,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskEntry {
    pub task: String,
    pub status: TaskStatus,
    pub details: String,
}

/// Summary of one orchestrated run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub start_time: String,
    pub end_time: String,
    pub elapsed_time: String,
    pub tasks: Vec<TaskEntry>,
    pub conclusions: String,
}

/// Accumulates task outcomes while a run is in progress.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    started: DateTime<Local>,
    tasks: Vec<TaskEntry>,
}

impl ReportBuilder {
    pub fn start(started: DateTime<Local>) -> Self {
        Self {
            started,
            tasks: Vec::new(),
        }
    }

    pub fn task(&mut self, task: impl Into<String>, status: TaskStatus, details: impl Into<String>) {
        self.tasks.push(TaskEntry {
            task: task.into(),
            status,
            details: details.into(),
        });
    }

    pub fn finish(self, ended: DateTime<Local>) -> RunReport {
        let elapsed = (ended - self.started).to_std().unwrap_or_default();
        let failed: Vec<&str> = self
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Failed)
            .map(|t| t.task.as_str())
            .collect();

        let conclusions = if failed.is_empty() {
            "All tasks were completed.".to_string()
        } else {
            format!(
                "{} of {} tasks failed: {}.",
                failed.len(),
                self.tasks.len(),
                failed.join(", ")
            )
        };

        RunReport {
            start_time: self.started.format(REPORT_TIMESTAMP_FORMAT).to_string(),
            end_time: ended.format(REPORT_TIMESTAMP_FORMAT).to_string(),
            elapsed_time: format!("{:.3}s", elapsed.as_secs_f64()),
            tasks: self.tasks,
            conclusions,
        }
    }
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.tasks.iter().any(|t| t.status == TaskStatus::Failed)
    }

    /// Plain-text rendering: one `key: value` block per field.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "start_time: {}\n", self.start_time);
        let _ = writeln!(out, "end_time: {}\n", self.end_time);
        let _ = writeln!(out, "elapsed_time: {}\n", self.elapsed_time);
        let _ = writeln!(out, "tasks:");
        for task in &self.tasks {
            let _ = writeln!(out, "  - {} [{:?}] {}", task.task, task.status, task.details);
        }
        let _ = writeln!(out, "\nconclusions: {}", self.conclusions);
        out
    }

    /// Write `report.json` and `report.txt` into `output_dir`.
    pub fn write(&self, output_dir: &Utf8Path) -> Result<(Utf8PathBuf, Utf8PathBuf)> {
        fs::create_dir_all(output_dir)?;

        let json_path = output_dir.join("report.json");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&json_path, json + "\n").map_err(|e| Error::manifest_io(json_path.as_str(), e))?;

        let txt_path = output_dir.join("report.txt");
        fs::write(&txt_path, self.to_text()).map_err(|e| Error::manifest_io(txt_path.as_str(), e))?;

        Ok((json_path, txt_path))
    }
}
