use crate::cleaner::CleaningReport;
use crate::config::ScalingPolicy;
use crate::error::Result;
use crate::scaling::FittedScaler;
use crate::signal::ButterworthLowPass;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSummary {
    pub order: usize,
    pub cutoff_hz: f64,
    pub sample_rate_hz: f64,
    pub b: Vec<f64>,
    pub a: Vec<f64>,
    pub min_rows: usize,
}

impl From<&ButterworthLowPass> for FilterSummary {
    fn from(filter: &ButterworthLowPass) -> Self {
        Self {
            order: filter.order(),
            cutoff_hz: filter.cutoff_hz(),
            sample_rate_hz: filter.sample_rate_hz(),
            b: filter.b().to_vec(),
            a: filter.a().to_vec(),
            min_rows: filter.min_signal_len(),
        }
    }
}

/// Summary of one pipeline run, suitable for JSON reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    /// RFC 3339 timestamp of when the run started.
    pub started_at: String,
    pub duration_ms: u64,
    pub cleaning: CleaningReport,
    pub filter: FilterSummary,
    pub scaling_policy: ScalingPolicy,
    pub scaler: FittedScaler,
    pub output_columns: Vec<String>,
    pub rows_written: usize,
}

impl ProcessingSummary {
    /// Write this summary as pretty JSON to `<stem>_report.json` next to
    /// `output`, returning the report path.
    pub fn write_report(&self, output: &Path) -> Result<PathBuf> {
        let report_path = report_path_for(output);
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

/// `<dir>/<stem>_report.json` next to the output file.
pub fn report_path_for(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output.with_file_name(format!("{stem}_report.json"))
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The fully conditioned table.
    pub data: DataFrame,
    pub summary: ProcessingSummary,
}
