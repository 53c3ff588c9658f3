//! Missing value triage and column pruning

use polars::prelude::*;
use serde::Serialize;

/// Columns at or above this null fraction are dropped from either table
pub const MISSING_THRESHOLD: f64 = 0.40;

/// Administrative columns of the previous-applications table that carry no
/// signal for default analysis. Dropped regardless of their null fraction.
pub const PREVIOUS_ADMIN_COLUMNS: [&str; 4] = [
    "WEEKDAY_APPR_PROCESS_START",
    "HOUR_APPR_PROCESS_START",
    "FLAG_LAST_APPL_PER_CONTRACT",
    "NFLAG_LAST_APPL_IN_DAY",
];

/// Null statistics for a single column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissingInfo {
    pub column: String,
    pub null_count: usize,
    /// `null_count / row_count`, in `[0, 1]`
    pub null_fraction: f64,
}

/// Analyze missing values of every column in the dataset.
///
/// Returns one entry per column sorted by null fraction descending, ties
/// broken by column name so the output is stable across runs.
pub fn analyze_missing_values(df: &DataFrame) -> Vec<ColumnMissingInfo> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Vec::new();
    }

    let rows = df.height() as f64;

    let mut info: Vec<ColumnMissingInfo> = df
        .get_columns()
        .iter()
        .map(|column| {
            let null_count = column.null_count();
            ColumnMissingInfo {
                column: column.name().to_string(),
                null_count,
                null_fraction: null_count as f64 / rows,
            }
        })
        .collect();

    info.sort_by(|a, b| {
        b.null_fraction
            .partial_cmp(&a.null_fraction)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.column.cmp(&b.column))
    });

    info
}

/// Get columns whose null fraction is at or above `threshold`.
///
/// Protected columns (identifier, outcome) are never returned.
pub fn columns_above_threshold(
    info: &[ColumnMissingInfo],
    threshold: f64,
    protected: &[&str],
) -> Vec<String> {
    info.iter()
        .filter(|c| c.null_fraction >= threshold && !protected.contains(&c.column.as_str()))
        .map(|c| c.column.clone())
        .collect()
}

/// Drop the named columns that exist in `df`; names that are absent are
/// skipped. Returns the pruned frame and the columns actually dropped.
pub fn prune_columns<S: AsRef<str>>(df: DataFrame, names: &[S]) -> (DataFrame, Vec<String>) {
    let present: Vec<String> = names
        .iter()
        .map(|n| n.as_ref())
        .filter(|n| super::columns::has_column(&df, n))
        .map(str::to_string)
        .collect();

    if present.is_empty() {
        return (df, present);
    }

    let pruned = df.drop_many(present.iter().map(String::as_str));
    (pruned, present)
}
