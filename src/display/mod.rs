//! Human-readable rendering of findings.
pub mod describe;

pub use describe::{describe, describe_all};
