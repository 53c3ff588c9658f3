//! Cleaning report export

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CleaningReport, PipelineConfig, SourcePair, MISSING_THRESHOLD};

/// Metadata about the cleaning run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    /// Loanscope version
    pub loanscope_version: String,
    pub sources: SourcePair,
    pub missing_threshold: f64,
    pub config: PipelineConfig,
}

/// Complete cleaning report export with metadata
#[derive(Serialize)]
pub struct CleaningReportExport<'a> {
    pub metadata: RunMetadata,
    #[serde(flatten)]
    pub report: &'a CleaningReport,
}

pub fn build_export<'a>(
    report: &'a CleaningReport,
    sources: &SourcePair,
    config: &PipelineConfig,
) -> CleaningReportExport<'a> {
    CleaningReportExport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            loanscope_version: env!("CARGO_PKG_VERSION").to_string(),
            sources: sources.clone(),
            missing_threshold: MISSING_THRESHOLD,
            config: *config,
        },
        report,
    }
}

/// Export the cleaning report to a JSON file.
///
/// Only metadata is written; the cleaned tables stay in memory.
pub fn export_cleaning_report(
    report: &CleaningReport,
    sources: &SourcePair,
    config: &PipelineConfig,
    output_path: &Path,
) -> Result<()> {
    let export = build_export(report, sources, config);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize cleaning report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write cleaning report to {}", output_path.display()))?;

    Ok(())
}
