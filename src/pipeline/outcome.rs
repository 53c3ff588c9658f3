//! Human-readable outcome labels

use polars::prelude::*;
use serde::Serialize;

use super::columns::{has_column, TARGET, TARGET_LABEL};

/// Outcome of a loan: the decoded value of the `TARGET` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum OutcomeLabel {
    Repayer,
    Defaulter,
}

impl OutcomeLabel {
    pub const ALL: [OutcomeLabel; 2] = [OutcomeLabel::Repayer, OutcomeLabel::Defaulter];

    pub fn label(self) -> &'static str {
        match self {
            OutcomeLabel::Repayer => "Repayer (0)",
            OutcomeLabel::Defaulter => "Defaulter (1)",
        }
    }

    /// Decode a flag value; anything other than 0 or 1 has no label
    pub fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            0 => Some(OutcomeLabel::Repayer),
            1 => Some(OutcomeLabel::Defaulter),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.label() == label)
    }
}

impl std::fmt::Display for OutcomeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Read the outcome flag column as `Option<OutcomeLabel>` per row.
///
/// Returns `None` when the frame has no outcome flag.
pub fn outcome_labels(df: &DataFrame) -> PolarsResult<Option<Vec<Option<OutcomeLabel>>>> {
    if !has_column(df, TARGET) {
        return Ok(None);
    }

    let flags = df.column(TARGET)?.cast(&DataType::Int64)?;
    let labels = flags
        .i64()?
        .into_iter()
        .map(|v| v.and_then(OutcomeLabel::from_flag))
        .collect();

    Ok(Some(labels))
}

/// Add the outcome label column if it is not already there.
///
/// A frame without the outcome flag is returned unchanged.
pub fn ensure_outcome_label(mut df: DataFrame) -> PolarsResult<DataFrame> {
    if has_column(&df, TARGET_LABEL) {
        return Ok(df);
    }

    let Some(labels) = outcome_labels(&df)? else {
        return Ok(df);
    };

    let values: Vec<Option<&'static str>> = labels.into_iter().map(|l| l.map(OutcomeLabel::label)).collect();
    df.with_column(Series::new(TARGET_LABEL.into(), values))?;
    Ok(df)
}
