//! Error types for the cleaning pipeline.
//!
//! Every variant is a load failure: the pipeline cannot produce a trustworthy
//! triple of tables. Missing optional columns and degenerate statistics are
//! not errors and never reach this type.

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source could not be opened or parsed as a table.
    #[error("failed to read {location}: {error}")]
    Read {
        location: String,
        #[source]
        error: PolarsError,
    },

    /// A remote source could not be downloaded.
    #[error("failed to fetch {location}: {error}")]
    Fetch {
        location: String,
        #[source]
        error: reqwest::Error,
    },

    #[error("unsupported file format '{extension}' for {location}. Supported formats: csv, parquet")]
    UnsupportedFormat { location: String, extension: String },

    /// The join key is absent.
    #[error("{location} has no '{column}' column")]
    MissingKey {
        location: String,
        column: &'static str,
    },

    /// The join key exists but is not integer-like.
    #[error("column '{column}' of {location} is not integer-like: {error}")]
    KeyType {
        location: String,
        column: &'static str,
        #[source]
        error: PolarsError,
    },

    /// A cleaning stage hit an unexpected frame error.
    #[error("cleaning failed: {0}")]
    Transform(#[from] PolarsError),
}
