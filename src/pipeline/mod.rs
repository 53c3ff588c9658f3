//! Pipeline module - orchestrates the cleaning stages
//!
//! Stage A prunes sparse columns, stage B imputes and normalizes, stage C
//! derives bucket features and joins the two tables. Any load failure turns
//! the whole run into `None`; partial results are never returned.

pub mod buckets;
pub mod cache;
pub mod columns;
pub mod error;
pub mod impute;
pub mod merge;
pub mod missing;
pub mod normalize;
pub mod outcome;
pub mod source;

use polars::prelude::*;
use serde::Serialize;
use tracing::{error, info, info_span};

pub use buckets::*;
pub use cache::PipelineCache;
pub use columns::*;
pub use error::PipelineError;
pub use impute::*;
pub use merge::*;
pub use missing::*;
pub use normalize::*;
pub use outcome::*;
pub use source::*;

/// Tunables of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    /// Rows used for CSV schema inference; 0 scans the whole file
    pub infer_schema_length: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
        }
    }
}

/// What happened to one input table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableReport {
    pub source: String,
    pub rows: usize,
    pub columns_loaded: usize,
    pub columns_retained: usize,
    /// Null statistics taken at load time
    pub missing: Vec<ColumnMissingInfo>,
    pub dropped_missing: Vec<String>,
    pub dropped_admin: Vec<String>,
    pub imputation: ImputationOutcome,
    pub normalized: Vec<String>,
    pub derived: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub applications: TableReport,
    pub previous_applications: TableReport,
    pub merge: MergeStats,
}

/// The three output tables of a successful run
#[derive(Debug, Clone)]
pub struct CleanedTables {
    pub applications: DataFrame,
    pub previous_applications: DataFrame,
    pub merged: DataFrame,
    pub report: CleaningReport,
}

impl CleanedTables {
    /// `(applications, previous applications, merged)`
    pub fn as_triple(&self) -> (&DataFrame, &DataFrame, &DataFrame) {
        (&self.applications, &self.previous_applications, &self.merged)
    }
}

/// Stage A on any table: collect null statistics and drop sparse columns
fn triage(df: DataFrame, report: &mut TableReport) -> DataFrame {
    report.rows = df.height();
    report.columns_loaded = df.width();
    report.missing = analyze_missing_values(&df);

    let sparse = columns_above_threshold(&report.missing, MISSING_THRESHOLD, &PROTECTED_COLUMNS);
    let (df, dropped) = prune_columns(df, &sparse);
    report.dropped_missing = dropped;
    df
}

/// Clean the applications table: stages A, B and the bucket derivation of C.
pub fn clean_applications(df: DataFrame, source: &DataSource) -> PolarsResult<(DataFrame, TableReport)> {
    let _span = info_span!("applications", source = %source).entered();
    let mut report = TableReport {
        source: source.to_string(),
        ..Default::default()
    };

    let df = triage(df, &mut report);

    let (df, imputation) = impute_columns(df, &APPLICATION_RULES)?;
    report.imputation = imputation;

    let (df, normalized) = normalize_day_offsets(df)?;
    report.normalized = normalized;

    let (df, mut derived) = derive_buckets(df)?;
    let had_label = has_column(&df, TARGET_LABEL);
    let df = ensure_outcome_label(df)?;
    if !had_label && has_column(&df, TARGET_LABEL) {
        derived.push(TARGET_LABEL.to_string());
    }
    report.derived = derived;
    report.columns_retained = df.width();

    info!(
        dropped = report.dropped_missing.len(),
        imputed = report.imputation.applied.len(),
        normalized = report.normalized.len(),
        derived = report.derived.len(),
        "applications cleaned"
    );
    Ok((df, report))
}

/// Clean the previous-applications table: stages A and B.
pub fn clean_previous_applications(
    df: DataFrame,
    source: &DataSource,
) -> PolarsResult<(DataFrame, TableReport)> {
    let _span = info_span!("previous_applications", source = %source).entered();
    let mut report = TableReport {
        source: source.to_string(),
        ..Default::default()
    };

    let df = triage(df, &mut report);
    let (df, dropped_admin) = prune_columns(df, &PREVIOUS_ADMIN_COLUMNS);
    report.dropped_admin = dropped_admin;

    let (df, imputation) = impute_columns(df, &PREVIOUS_RULES)?;
    report.imputation = imputation;

    let (df, normalized) = normalize_day_offsets(df)?;
    report.normalized = normalized;
    report.columns_retained = df.width();

    info!(
        dropped = report.dropped_missing.len() + report.dropped_admin.len(),
        imputed = report.imputation.applied.len(),
        normalized = report.normalized.len(),
        "previous applications cleaned"
    );
    Ok((df, report))
}

/// Run the whole pipeline, surfacing the reason of a load failure.
pub fn try_run_pipeline(sources: &SourcePair, config: &PipelineConfig) -> Result<CleanedTables, PipelineError> {
    let applications = load_table(&sources.applications, config.infer_schema_length)?;
    let previous = load_table(&sources.previous, config.infer_schema_length)?;

    let (applications, applications_report) = clean_applications(applications, &sources.applications)?;
    let (previous, previous_report) = clean_previous_applications(previous, &sources.previous)?;

    let merged = merge_tables(&applications, &previous)?;
    let merge = merge_stats(&merged)?;
    info!(rows = merge.rows, applicants = merge.applicants, "tables merged");

    Ok(CleanedTables {
        applications,
        previous_applications: previous,
        merged,
        report: CleaningReport {
            applications: applications_report,
            previous_applications: previous_report,
            merge,
        },
    })
}

/// Run the whole pipeline.
///
/// Returns `None` when either source cannot be loaded; the failure is logged
/// with both source identifiers and never propagated.
pub fn run_pipeline(sources: &SourcePair, config: &PipelineConfig) -> Option<CleanedTables> {
    match try_run_pipeline(sources, config) {
        Ok(tables) => Some(tables),
        Err(e) => {
            error!(
                applications = %sources.applications,
                previous = %sources.previous,
                error = %e,
                "error loading datasets"
            );
            None
        }
    }
}
