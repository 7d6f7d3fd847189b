//! Classification of a student's evaluation order into findings.
pub mod collector;
pub mod error;

pub use collector::{collect_errors, AnalysisOptions, ErrorCollector};
pub use error::{StudentError, StudentErrorType};
