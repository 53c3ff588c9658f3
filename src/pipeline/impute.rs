//! Column-specific imputation of missing values
//!
//! Each table carries a fixed list of `(column, rule)` pairs. A rule only runs
//! if its column survived pruning; columns without a rule keep their nulls.
//! Rows are never dropped for missingness.

use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use super::columns::*;

/// How a column's nulls are replaced
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImputeRule {
    /// Most frequent non-null value; ties resolve to the smallest value
    Mode,
    /// Arithmetic mean of the non-null values
    Mean,
    /// Median of the non-null values
    Median,
    /// A fixed literal
    Constant(f64),
}

impl std::fmt::Display for ImputeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImputeRule::Mode => write!(f, "mode"),
            ImputeRule::Mean => write!(f, "mean"),
            ImputeRule::Median => write!(f, "median"),
            ImputeRule::Constant(v) => write!(f, "constant({})", v),
        }
    }
}

/// Imputation rules for the applications table
pub const APPLICATION_RULES: [(&str, ImputeRule); 5] = [
    (CNT_FAM_MEMBERS, ImputeRule::Mode),
    (OCCUPATION_TYPE, ImputeRule::Mode),
    (NAME_TYPE_SUITE, ImputeRule::Mode),
    (AMT_ANNUITY, ImputeRule::Mean),
    (AMT_GOODS_PRICE, ImputeRule::Median),
];

/// Imputation rules for the previous-applications table
pub const PREVIOUS_RULES: [(&str, ImputeRule); 4] = [
    (AMT_GOODS_PRICE, ImputeRule::Median),
    (AMT_ANNUITY, ImputeRule::Median),
    (PRODUCT_COMBINATION, ImputeRule::Mode),
    (CNT_PAYMENT, ImputeRule::Constant(0.0)),
];

/// The value written into a column's null cells
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FillValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for FillValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FillValue::Number(v) => write!(f, "{}", v),
            FillValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A rule that was applied to a column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Imputation {
    pub column: String,
    pub rule: ImputeRule,
    pub fill_value: FillValue,
    /// Number of null cells replaced
    pub filled: usize,
}

/// A rule whose statistic could not be computed; the column keeps its nulls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedImputation {
    pub column: String,
    pub rule: ImputeRule,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImputationOutcome {
    pub applied: Vec<Imputation>,
    pub skipped: Vec<SkippedImputation>,
}

/// Compute the fill value of `rule` over the non-null values of `column`.
///
/// Returns `Ok(None)` when the statistic is degenerate: no non-null values,
/// or a numeric rule over a non-numeric column.
pub fn compute_fill_value(column: &Column, rule: ImputeRule) -> PolarsResult<Option<FillValue>> {
    let dtype = column.dtype();
    let numeric = dtype.is_primitive_numeric();

    let fill = match rule {
        ImputeRule::Mode if dtype == &DataType::String => {
            let mut values: Vec<&str> = column.str()?.into_iter().flatten().collect();
            values.sort_unstable();
            most_frequent(&values).map(|s| FillValue::Text(s.to_string()))
        }
        ImputeRule::Mode if numeric => {
            let floats = column.cast(&DataType::Float64)?;
            let mut values: Vec<f64> = floats
                .f64()?
                .into_iter()
                .flatten()
                .filter(|v| !v.is_nan())
                .collect();
            values.sort_unstable_by(|a, b| a.total_cmp(b));
            most_frequent(&values).map(FillValue::Number)
        }
        ImputeRule::Mean if numeric => {
            let floats = column.cast(&DataType::Float64)?;
            floats.f64()?.mean().map(FillValue::Number)
        }
        ImputeRule::Median if numeric => {
            let floats = column.cast(&DataType::Float64)?;
            floats.f64()?.median().map(FillValue::Number)
        }
        ImputeRule::Constant(v) if numeric => Some(FillValue::Number(v)),
        _ => None,
    };

    Ok(fill.filter(|f| !matches!(f, FillValue::Number(v) if v.is_nan())))
}

/// First value of the longest run in an ascending slice.
///
/// Since the slice is sorted, ties resolve to the smallest value.
fn most_frequent<T: PartialEq + Copy>(sorted: &[T]) -> Option<T> {
    sorted
        .chunk_by(|a, b| a == b)
        .fold(None, |best: Option<&[T]>, run| match best {
            Some(b) if b.len() >= run.len() => Some(b),
            _ => Some(run),
        })
        .map(|run| run[0])
}

/// Apply `rules` to the columns of `df` that exist.
///
/// Absent columns are skipped silently. Degenerate statistics are skipped
/// with a warning and recorded in the returned outcome.
pub fn impute_columns(
    df: DataFrame,
    rules: &[(&str, ImputeRule)],
) -> PolarsResult<(DataFrame, ImputationOutcome)> {
    let mut outcome = ImputationOutcome::default();
    let mut exprs: Vec<Expr> = Vec::new();

    for &(name, rule) in rules {
        if !has_column(&df, name) {
            debug!(column = name, "column absent, imputation skipped");
            continue;
        }

        let column = df.column(name)?;
        let nulls = column.null_count();

        let Some(fill_value) = compute_fill_value(column, rule)? else {
            warn!(
                column = name,
                rule = %rule,
                dtype = %column.dtype(),
                "cannot compute fill value, column keeps its nulls"
            );
            outcome.skipped.push(SkippedImputation {
                column: name.to_string(),
                rule,
                reason: format!("{} undefined for {} column with {} nulls", rule, column.dtype(), nulls),
            });
            continue;
        };

        if nulls > 0 {
            exprs.push(fill_expr(name, column.dtype(), rule, &fill_value));
        }

        debug!(column = name, rule = %rule, fill = %fill_value, filled = nulls, "imputed");
        outcome.applied.push(Imputation {
            column: name.to_string(),
            rule,
            fill_value,
            filled: nulls,
        });
    }

    if exprs.is_empty() {
        return Ok((df, outcome));
    }

    let df = df.lazy().with_columns(exprs).collect()?;
    Ok((df, outcome))
}

/// Mean and median produce a Float64 column; mode and constants keep the
/// column's dtype.
fn fill_expr(name: &str, dtype: &DataType, rule: ImputeRule, fill: &FillValue) -> Expr {
    match (fill, rule) {
        (FillValue::Number(v), ImputeRule::Mean | ImputeRule::Median) => {
            col(name).cast(DataType::Float64).fill_null(lit(*v))
        }
        (FillValue::Number(v), _) => col(name).fill_null(lit(*v).cast(dtype.clone())),
        (FillValue::Text(s), _) => col(name).fill_null(lit(s.clone())),
    }
}
