//! Sign normalization of day-offset columns
//!
//! The source encodes dates as negative day offsets from the application
//! date. Every column following the `DAYS*` naming convention is turned into
//! a non-negative magnitude; there is no allow-list.

use polars::prelude::*;
use tracing::debug;

/// Prefix shared by all day-offset columns
pub const DAY_OFFSET_PREFIX: &str = "DAYS";

/// Is `name` a day-offset column?
pub fn is_day_offset_column(name: &str) -> bool {
    name.starts_with(DAY_OFFSET_PREFIX)
}

/// Replace every numeric day-offset column by its absolute value.
///
/// Returns the normalized frame and the names of the columns it touched.
/// Matching columns that are not numeric are left as they are. Narrow
/// signed integers are widened to `Int64` first; a value with no
/// representable magnitude (`i64::MIN`) becomes null.
pub fn normalize_day_offsets(df: DataFrame) -> PolarsResult<(DataFrame, Vec<String>)> {
    let mut normalized = Vec::new();
    let mut exprs = Vec::new();

    for column in df.get_columns() {
        let name = column.name().as_str();
        if !is_day_offset_column(name) {
            continue;
        }
        if column.dtype().is_primitive_numeric() {
            normalized.push(name.to_string());
            exprs.push(magnitude(name, column.dtype()));
        } else {
            debug!(column = name, dtype = %column.dtype(), "non-numeric day-offset column left as is");
        }
    }

    if normalized.is_empty() {
        return Ok((df, normalized));
    }

    let df = df.lazy().with_columns(exprs).collect()?;

    Ok((df, normalized))
}

fn magnitude(name: &str, dtype: &DataType) -> Expr {
    match dtype {
        DataType::Int8 | DataType::Int16 | DataType::Int32 => {
            col(name).cast(DataType::Int64).abs().alias(name)
        }
        DataType::Int64 | DataType::Int128 => {
            // abs() wraps the minimum back onto itself
            let abs = col(name).abs();
            when(abs.clone().lt(lit(0)))
                .then(lit(NULL))
                .otherwise(abs)
                .alias(name)
        }
        _ => col(name).abs().alias(name),
    }
}
