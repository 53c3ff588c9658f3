//! Report module - summarizing cleaning results and insights

pub mod export;
pub mod insights;
pub mod summary;

pub use export::*;
pub use insights::*;
pub use summary::*;
