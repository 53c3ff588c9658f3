//! Command-line argument definitions using clap

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::pipeline::{
    DataSource, PipelineConfig, SourcePair, DEFAULT_APPLICATIONS, DEFAULT_INFER_SCHEMA_LENGTH,
    DEFAULT_PREVIOUS,
};

/// Loanscope - Clean and join loan application datasets, then summarize default risk
#[derive(Parser, Debug)]
#[command(name = "loanscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Applications table: local CSV/Parquet path or http(s) URI
    #[arg(short, long, default_value = DEFAULT_APPLICATIONS)]
    pub applications: DataSource,

    /// Previous-applications table: local CSV/Parquet path or http(s) URI
    #[arg(short, long, default_value = DEFAULT_PREVIOUS)]
    pub previous: DataSource,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value_t = DEFAULT_INFER_SCHEMA_LENGTH)]
    pub infer_schema_length: usize,

    /// Write the cleaning report (dropped columns, imputations, merge shape) as JSON
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Skip the default-rate insights after cleaning
    #[arg(long, default_value = "false")]
    pub no_insights: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    pub fn sources(&self) -> SourcePair {
        SourcePair {
            applications: self.applications.clone(),
            previous: self.previous.clone(),
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            infer_schema_length: self.infer_schema_length,
        }
    }
}
