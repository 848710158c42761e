use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::config::UserConfig;
use crate::engine::Distribution;
use crate::error::Result;

/// Snapshot of one completed analysis run, persisted for later review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub timestamp: DateTime<Utc>,
    pub config: UserConfig,
    pub opportunities_scored: usize,
    pub distributions: Vec<Distribution>,
    pub summary: Vec<String>,
}

impl AnalysisReport {
    pub fn new(
        config: UserConfig,
        opportunities_scored: usize,
        distributions: Vec<Distribution>,
        summary: Vec<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            config,
            opportunities_scored,
            distributions,
            summary,
        }
    }
}

/// Writes one pretty-printed JSON file per run under the report directory.
pub struct ReportWriter {
    report_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(report_dir: Option<&str>) -> Result<Self> {
        let report_dir = PathBuf::from(report_dir.unwrap_or("./logs"));
        std::fs::create_dir_all(&report_dir)?;
        Ok(Self { report_dir })
    }

    pub fn write(&self, report: &AnalysisReport) -> Result<PathBuf> {
        let filename = format!(
            "analysis-{}.json",
            report.timestamp.format("%Y%m%dT%H%M%S")
        );
        let path = self.report_dir.join(filename);

        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&path, json)?;

        info!("Wrote analysis report to {}", path.display());
        Ok(path)
    }
}
