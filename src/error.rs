//! Error types for eventdesk.
//!
//! Workflow refusals (wrong role, wrong state, unknown id) are not errors;
//! they surface as `Ok(None)`. Everything here is a caller contract
//! violation or an ambient failure.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid payload: {0}")]
    Validation(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("unknown recommendation: {0}")]
    UnknownRecommendation(String),

    #[error("unknown review decision: {0}")]
    UnknownDecision(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
