//! Read-only aggregations over the cleaned tables
//!
//! Everything here is a pure projection of the pipeline output: nothing
//! mutates the tables and nothing needs coordination with the pipeline.

pub mod correlation;

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{has_column, outcome_labels, Bucket, OutcomeLabel, AMT_CREDIT, NAME_CONTRACT_STATUS};

pub use correlation::*;

/// Label used for rows whose category is null
pub const MISSING_CATEGORY: &str = "(missing)";

/// Headline figures of the applications table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioOverview {
    pub applicants: usize,
    pub defaulters: usize,
    /// Defaulters over applicants with a known outcome
    pub default_rate: f64,
    pub mean_credit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeCount {
    pub outcome: OutcomeLabel,
    pub count: usize,
    pub share: f64,
}

/// Default rate of one category of a categorical column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRate {
    pub category: String,
    pub applicants: usize,
    pub defaulters: usize,
    pub default_rate: f64,
}

/// Default rate of one bucket of a derived range column
#[derive(Debug, Clone, PartialEq)]
pub struct BucketRate<B> {
    pub bucket: B,
    pub applicants: usize,
    pub defaulters: usize,
    pub default_rate: f64,
}

/// Previous-application counts of one contract status, split by outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub repayers: usize,
    pub defaulters: usize,
}

fn rate(defaulters: usize, applicants: usize) -> f64 {
    if applicants == 0 {
        0.0
    } else {
        defaulters as f64 / applicants as f64
    }
}

/// Column values as strings, nulls kept
fn category_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<String>>> {
    let values = df.column(column)?.cast(&DataType::String)?;
    Ok(values
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

pub fn portfolio_overview(df: &DataFrame) -> PolarsResult<Option<PortfolioOverview>> {
    let Some(labels) = outcome_labels(df)? else {
        return Ok(None);
    };

    let known = labels.iter().flatten().count();
    let defaulters = labels
        .iter()
        .filter(|l| **l == Some(OutcomeLabel::Defaulter))
        .count();

    let mean_credit = if has_column(df, AMT_CREDIT) {
        let credit = df.column(AMT_CREDIT)?.cast(&DataType::Float64)?;
        credit.f64()?.mean()
    } else {
        None
    };

    Ok(Some(PortfolioOverview {
        applicants: df.height(),
        defaulters,
        default_rate: rate(defaulters, known),
        mean_credit,
    }))
}

/// Count of each outcome; empty when the outcome flag is missing
pub fn outcome_distribution(df: &DataFrame) -> PolarsResult<Vec<OutcomeCount>> {
    let Some(labels) = outcome_labels(df)? else {
        return Ok(Vec::new());
    };

    let known = labels.iter().flatten().count();
    Ok(OutcomeLabel::ALL
        .into_iter()
        .map(|outcome| {
            let count = labels.iter().filter(|l| **l == Some(outcome)).count();
            OutcomeCount {
                outcome,
                count,
                share: rate(count, known),
            }
        })
        .collect())
}

/// Default rate per category of `column`, highest rate first.
///
/// Null categories are reported as [`MISSING_CATEGORY`]; rows without a known
/// outcome are ignored. Empty when either column is missing.
pub fn default_rate_by(df: &DataFrame, column: &str) -> PolarsResult<Vec<CategoryRate>> {
    if !has_column(df, column) {
        return Ok(Vec::new());
    }
    let Some(labels) = outcome_labels(df)? else {
        return Ok(Vec::new());
    };

    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for (category, outcome) in category_values(df, column)?.into_iter().zip(labels) {
        let Some(outcome) = outcome else { continue };
        let entry = counts
            .entry(category.unwrap_or_else(|| MISSING_CATEGORY.to_string()))
            .or_default();
        entry.0 += 1;
        if outcome == OutcomeLabel::Defaulter {
            entry.1 += 1;
        }
    }

    let mut rates: Vec<CategoryRate> = counts
        .into_iter()
        .map(|(category, (applicants, defaulters))| CategoryRate {
            category,
            applicants,
            defaulters,
            default_rate: rate(defaulters, applicants),
        })
        .collect();

    rates.sort_by(|a, b| {
        b.default_rate
            .partial_cmp(&a.default_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });

    Ok(rates)
}

/// Default rate of every bucket of family `B`, in bucket order.
///
/// Empty when the derived range column or the outcome flag is missing.
pub fn bucket_default_rates<B: Bucket>(df: &DataFrame) -> PolarsResult<Vec<BucketRate<B>>> {
    if !has_column(df, B::OUTPUT_COLUMN) {
        return Ok(Vec::new());
    }
    let Some(labels) = outcome_labels(df)? else {
        return Ok(Vec::new());
    };

    let mut counts = vec![(0usize, 0usize); B::ALL.len()];
    for (bucket, outcome) in category_values(df, B::OUTPUT_COLUMN)?.into_iter().zip(labels) {
        let (Some(bucket), Some(outcome)) = (bucket.as_deref().and_then(B::from_label), outcome) else {
            continue;
        };
        // ALL is ordered, so the position is the ordinal
        let idx = B::ALL.iter().position(|b| *b == bucket).unwrap_or_default();
        counts[idx].0 += 1;
        if outcome == OutcomeLabel::Defaulter {
            counts[idx].1 += 1;
        }
    }

    Ok(B::ALL
        .iter()
        .zip(counts)
        .map(|(&bucket, (applicants, defaulters))| BucketRate {
            bucket,
            applicants,
            defaulters,
            default_rate: rate(defaulters, applicants),
        })
        .collect())
}

/// Previous-application contract status counts split by outcome, by status
pub fn status_by_outcome(merged: &DataFrame) -> PolarsResult<Vec<StatusCount>> {
    if !has_column(merged, NAME_CONTRACT_STATUS) {
        return Ok(Vec::new());
    }
    let Some(labels) = outcome_labels(merged)? else {
        return Ok(Vec::new());
    };

    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for (status, outcome) in category_values(merged, NAME_CONTRACT_STATUS)?.into_iter().zip(labels) {
        let entry = counts
            .entry(status.unwrap_or_else(|| MISSING_CATEGORY.to_string()))
            .or_default();
        match outcome {
            Some(OutcomeLabel::Repayer) => entry.0 += 1,
            Some(OutcomeLabel::Defaulter) => entry.1 += 1,
            None => {}
        }
    }

    Ok(counts
        .into_iter()
        .map(|(status, (repayers, defaulters))| StatusCount {
            status,
            repayers,
            defaulters,
        })
        .collect())
}
