//! Roadmap egress - appends assessment results to file
//!
//! Each roadmap entry becomes one JSON object per line (JSONL), tagged with
//! the run id and its 1-based rank, in the file specified in config.

use crate::domain::types::{Channel, Quadrant};
use crate::infra::config::Config;
use crate::services::assessment::Assessment;
use anyhow::Context;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One roadmap entry as written to the report file
#[derive(Debug, Serialize)]
pub struct ReportRow<'a> {
    pub run: &'a str,
    pub rank: usize,
    pub id: &'a str,
    pub name: &'a str,
    pub stage: &'a str,
    pub channel: Channel,
    pub quadrant: Quadrant,
    pub importance: f64,
    pub performance: f64,
    pub priority: f64,
}

/// Egress writer for assessment roadmaps
pub struct ReportEgress {
    file_path: PathBuf,
}

impl ReportEgress {
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        info!(file_path = %file_path.display(), "egress_initialized");
        Self { file_path }
    }

    /// Writer for the configured `[report] file`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.report_file())
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Report rows for an assessment, in roadmap order
    pub fn rows(assessment: &Assessment) -> Vec<ReportRow<'_>> {
        assessment
            .roadmap
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| ReportRow {
                run: &assessment.run_id,
                rank: i + 1,
                id: item.id().as_str(),
                name: &item.touchpoint.name,
                stage: item.touchpoint.stage.as_str(),
                channel: item.touchpoint.channel,
                quadrant: item.quadrant,
                importance: item.importance(),
                performance: item.performance(),
                priority: item.priority_score,
            })
            .collect()
    }

    /// Append every roadmap entry; returns the number of lines written
    pub fn write_assessment(&self, assessment: &Assessment) -> anyhow::Result<usize> {
        let rows = Self::rows(assessment);
        self.append_rows(&rows)
            .with_context(|| format!("Failed to write report {}", self.file_path.display()))?;

        info!(
            run_id = %assessment.run_id,
            file = %self.file_path.display(),
            rows = %rows.len(),
            "roadmap_egressed"
        );
        Ok(rows.len())
    }

    fn append_rows(&self, rows: &[ReportRow<'_>]) -> anyhow::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        let mut bytes = 0usize;
        for row in rows {
            let line = serde_json::to_string(row)?;
            bytes += line.len() + 1;
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;

        debug!(file = %self.file_path.display(), bytes = %bytes, "egress_written");
        Ok(())
    }
}
