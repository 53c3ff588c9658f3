//! Inner join of cleaned applications with their previous applications

use polars::prelude::*;
use serde::Serialize;

use super::columns::{APPLICANT_ID, PREVIOUS_SUFFIX, TARGET_LABEL};
use super::missing::prune_columns;
use super::outcome::ensure_outcome_label;

const APP_ROW: &str = "__application_row";
const PREV_ROW: &str = "__previous_row";

/// Shape of the merged table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub rows: usize,
    pub columns: usize,
    /// Distinct applicant identifiers present in both inputs
    pub applicants: usize,
}

/// Inner-join `applications` and `previous` on the applicant identifier.
///
/// One output row per matching (application, previous application) pair,
/// ordered by application row then previous-application row. A derived
/// outcome label on the previous side is discarded before the join and the
/// label is rebuilt from the outcome flag afterwards if it is missing. Other
/// overlapping columns from the previous side get the `_PREV` suffix.
pub fn merge_tables(applications: &DataFrame, previous: &DataFrame) -> PolarsResult<DataFrame> {
    let (previous, _) = prune_columns(previous.clone(), &[TARGET_LABEL]);

    let left = applications.clone().lazy().with_row_index(APP_ROW, None);
    let right = previous.lazy().with_row_index(PREV_ROW, None);

    let merged = left
        .join(
            right,
            [col(APPLICANT_ID)],
            [col(APPLICANT_ID)],
            JoinArgs::new(JoinType::Inner).with_suffix(Some(PREVIOUS_SUFFIX.into())),
        )
        .sort([APP_ROW, PREV_ROW], SortMultipleOptions::default())
        .drop([APP_ROW, PREV_ROW])
        .collect()?;

    ensure_outcome_label(merged)
}

pub fn merge_stats(merged: &DataFrame) -> PolarsResult<MergeStats> {
    let applicants = if merged.height() == 0 {
        0
    } else {
        merged
            .column(APPLICANT_ID)?
            .as_materialized_series()
            .n_unique()?
    };

    Ok(MergeStats {
        rows: merged.height(),
        columns: merged.width(),
        applicants,
    })
}
