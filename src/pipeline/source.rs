//! Input locations and dataset loading for CSV and Parquet sources

use std::convert::Infallible;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::columns::{has_column, APPLICANT_ID};
use super::error::PipelineError;

/// Default applications file, relative to the working directory
pub const DEFAULT_APPLICATIONS: &str = "application_data.csv";

/// Default previous-applications file, relative to the working directory
pub const DEFAULT_PREVIOUS: &str = "previous_application.csv";

/// Default number of rows used for CSV schema inference
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

/// Where a table is read from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum DataSource {
    Local(PathBuf),
    /// An `http://` or `https://` URI
    Remote(String),
}

impl DataSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, DataSource::Remote(_))
    }
}

impl FromStr for DataSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(DataSource::Remote(s.to_string()))
        } else {
            Ok(DataSource::Local(PathBuf::from(s)))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Local(path) => write!(f, "{}", path.display()),
            DataSource::Remote(url) => f.write_str(url),
        }
    }
}

impl From<&Path> for DataSource {
    fn from(path: &Path) -> Self {
        DataSource::Local(path.to_path_buf())
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        DataSource::Local(path)
    }
}

/// The two inputs of one pipeline run; also the identity the cache keys on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourcePair {
    pub applications: DataSource,
    pub previous: DataSource,
}

impl SourcePair {
    pub fn new(applications: impl Into<DataSource>, previous: impl Into<DataSource>) -> Self {
        Self {
            applications: applications.into(),
            previous: previous.into(),
        }
    }
}

impl Default for SourcePair {
    fn default() -> Self {
        Self::new(PathBuf::from(DEFAULT_APPLICATIONS), PathBuf::from(DEFAULT_PREVIOUS))
    }
}

/// Load a table and validate its applicant identifier.
///
/// The identifier is cast to Int64; float identifiers must be whole numbers.
/// Rows with a null identifier are dropped.
pub fn load_table(source: &DataSource, infer_schema_length: usize) -> Result<DataFrame, PipelineError> {
    let df = match source {
        DataSource::Local(path) => load_local(path, infer_schema_length)?,
        DataSource::Remote(url) => load_remote(url, infer_schema_length)?,
    };

    let df = validate_key(df, source)?;
    info!(source = %source, rows = df.height(), columns = df.width(), "loaded table");
    Ok(df)
}

fn schema_length(infer_schema_length: usize) -> Option<usize> {
    // 0 means full table scan
    if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    }
}

fn load_local(path: &Path, infer_schema_length: usize) -> Result<DataFrame, PipelineError> {
    let location = path.display().to_string();
    let read_error = |error| PipelineError::Read {
        location: location.clone(),
        error,
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" | "txt" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length(infer_schema_length))
            .finish()
            .map_err(read_error)?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default()).map_err(read_error)?,
        _ => {
            return Err(PipelineError::UnsupportedFormat {
                location: location.clone(),
                extension,
            })
        }
    };

    lf.collect().map_err(read_error)
}

fn load_remote(url: &str, infer_schema_length: usize) -> Result<DataFrame, PipelineError> {
    let fetch_error = |error| PipelineError::Fetch {
        location: url.to_string(),
        error,
    };

    debug!(url, "fetching remote table");
    let body = reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .map_err(fetch_error)?;

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(schema_length(infer_schema_length))
        .into_reader_with_file_handle(Cursor::new(body.to_vec()))
        .finish()
        .map_err(|error| PipelineError::Read {
            location: url.to_string(),
            error,
        })
}

fn validate_key(mut df: DataFrame, source: &DataSource) -> Result<DataFrame, PipelineError> {
    if !has_column(&df, APPLICANT_ID) {
        return Err(PipelineError::MissingKey {
            location: source.to_string(),
            column: APPLICANT_ID,
        });
    }

    let key_error = |error: PolarsError| PipelineError::KeyType {
        location: source.to_string(),
        column: APPLICANT_ID,
        error,
    };

    let raw = df.column(APPLICANT_ID)?.as_materialized_series();
    if raw.dtype().is_float() {
        // Casting would truncate 2.5 to 2 and invent a match
        let floats = raw.cast(&DataType::Float64)?;
        let bad = floats
            .f64()?
            .into_iter()
            .flatten()
            .find(|v| !v.is_finite() || v.fract() != 0.0);
        if let Some(bad) = bad {
            return Err(key_error(PolarsError::ComputeError(
                format!("identifier {} is not a whole number", bad).into(),
            )));
        }
    }

    let key = raw.strict_cast(&DataType::Int64).map_err(key_error)?;

    let null_keys = key.null_count();
    df.with_column(key)?;

    if null_keys > 0 {
        warn!(source = %source, rows = null_keys, "dropping rows without an applicant identifier");
        df = df.lazy().filter(col(APPLICANT_ID).is_not_null()).collect()?;
    }

    Ok(df)
}
