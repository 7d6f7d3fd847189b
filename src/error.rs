//! Error type shared by every analysis entry point.
use crate::store::TokenId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Fatal conditions. Any of these aborts the enclosing call; lookup misses
/// (no third operator, absent text) are never reported through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Token {token:?} has no 'index' attribute")]
    MissingIndex { token: TokenId },
    #[error("Token {token:?} has invalid 'index' value '{value}'")]
    InvalidIndex { token: TokenId, value: String },
    #[error("Index {index} is assigned to more than one token")]
    DuplicateIndex { index: u32 },
    #[error("Relation source {index} is outside the declared range 1..={max}")]
    IndexOutOfRange { index: u32, max: u32 },
    #[error("No token with index {0}")]
    UnknownIndex(u32),
    #[error("Unknown relation name '{0}'")]
    UnknownPredicate(String),
    #[error("Unknown error '{0}'")]
    UnknownErrorType(String),
    #[error("Malformed JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for AnalysisError {
    fn from(e: serde_json::Error) -> Self {
        AnalysisError::Json(e.to_string())
    }
}
