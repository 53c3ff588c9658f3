//! Loanscope: Loan Application Cleaning Library
//!
//! Cleans the applications and previous-applications datasets, derives
//! bucket features, joins them, and aggregates default insights from the
//! resulting tables.

pub mod cli;
pub mod insights;
pub mod pipeline;
pub mod report;
pub mod utils;
