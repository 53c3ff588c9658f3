//! Correlation matrix of numeric columns among defaulters

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use crate::pipeline::columns::*;

/// Columns compared in the defaulter correlation matrix
pub const DEFAULT_CORRELATION_COLUMNS: [&str; 6] = [
    AMT_INCOME_TOTAL,
    AMT_CREDIT,
    AMT_ANNUITY,
    AMT_GOODS_PRICE,
    DAYS_BIRTH,
    DAYS_EMPLOYED,
];

/// Symmetric Pearson correlation matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation of `columns[i]` and `columns[j]`;
    /// `None` when undefined (constant column, fewer than two shared rows)
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Correlation matrix of `columns` restricted to rows whose outcome flag is 1.
///
/// Columns that are absent or not numeric are left out. Returns `None` when
/// the outcome flag is missing or fewer than two columns remain.
pub fn defaulter_correlations(df: &DataFrame, columns: &[&str]) -> PolarsResult<Option<CorrelationMatrix>> {
    if !has_column(df, TARGET) {
        return Ok(None);
    }

    let defaulters = df
        .clone()
        .lazy()
        .filter(col(TARGET).cast(DataType::Int64).eq(lit(1i64)))
        .collect()?;

    correlation_matrix(&defaulters, columns)
}

/// Correlation matrix of the numeric `columns` present in `df`
pub fn correlation_matrix(df: &DataFrame, columns: &[&str]) -> PolarsResult<Option<CorrelationMatrix>> {
    let mut float_columns: Vec<(String, Column)> = Vec::new();
    for &name in columns {
        if !has_column(df, name) {
            continue;
        }
        let column = df.column(name)?;
        if column.dtype().is_primitive_numeric() {
            float_columns.push((name.to_string(), column.cast(&DataType::Float64)?));
        }
    }

    let n = float_columns.len();
    if n < 2 {
        return Ok(None);
    }

    // Upper triangle pairs
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let correlations: Vec<((usize, usize), Option<f64>)> = pairs
        .par_iter()
        .map(|&(i, j)| ((i, j), pearson(&float_columns[i].1, &float_columns[j].1)))
        .collect();

    let mut values = vec![vec![None; n]; n];
    for (i, row) in values.iter_mut().enumerate() {
        row[i] = Some(1.0);
    }
    for ((i, j), corr) in correlations {
        values[i][j] = corr;
        values[j][i] = corr;
    }

    Ok(Some(CorrelationMatrix {
        columns: float_columns.into_iter().map(|(name, _)| name).collect(),
        values,
    }))
}

/// Pearson correlation over rows where both values are present.
///
/// Single-pass Welford update for numerical stability.
fn pearson(s1: &Column, s2: &Column) -> Option<f64> {
    let ca1 = s1.f64().ok()?;
    let ca2 = s2.f64().ok()?;

    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in ca1.iter().zip(ca2.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            if x.is_nan() || y.is_nan() {
                continue;
            }
            n += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2.0 || var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov_xy / (var_x.sqrt() * var_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_correlations() {
        let df = df! {
            "a" => [1.0f64, 2.0, 3.0, 4.0],
            "b" => [2.0f64, 4.0, 6.0, 8.0],
            "c" => [4.0f64, 3.0, 2.0, 1.0],
            "constant" => [5.0f64; 4],
        }
        .unwrap();

        let m = correlation_matrix(&df, &["a", "b", "c", "constant"]).unwrap().unwrap();
        assert!((m.get("a", "b").unwrap() - 1.0).abs() < 1e-10);
        assert!((m.get("a", "c").unwrap() + 1.0).abs() < 1e-10);
        assert_eq!(m.get("a", "constant"), None);
        assert_eq!(m.get("c", "c"), Some(1.0));
    }

    #[test]
    fn test_skips_absent_and_text_columns() {
        let df = df! {
            "a" => [1.0f64, 2.0],
            "t" => ["x", "y"],
        }
        .unwrap();

        assert!(correlation_matrix(&df, &["a", "t", "nope"]).unwrap().is_none());
    }
}
