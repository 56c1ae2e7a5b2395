//! Error types for the Aegis generation layer.

use std::time::Duration;
use thiserror::Error;

/// A decoded response that does not satisfy its schema contract.
///
/// `field` is a JSON path into the response (`$` for the root,
/// `scores.physics`, `failureModes[2].impact`, `[3].id`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid field `{field}`: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Terminal errors surfaced by the generation layer
#[derive(Debug, Clone, Error)]
pub enum AegisError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Response validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Deadline of {0:?} exceeded before the request completed")]
    DeadlineExceeded(Duration),
}

impl AegisError {
    /// Stable short tag for rendering failures to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            AegisError::Configuration(_) => "configuration",
            AegisError::QuotaExceeded(_) => "quota_exceeded",
            AegisError::Request(_) => "request",
            AegisError::Validation(_) => "validation",
            AegisError::EmptyResponse(_) => "empty_response",
            AegisError::DeadlineExceeded(_) => "deadline_exceeded",
        }
    }
}

impl From<config::ConfigError> for AegisError {
    fn from(err: config::ConfigError) -> Self {
        AegisError::Configuration(err.to_string())
    }
}
