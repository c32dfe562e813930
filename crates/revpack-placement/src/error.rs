//! Placement error types.

use thiserror::Error;

/// Errors that can occur while choosing a host.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    /// No candidate can take the request at or under 100% projected
    /// utilization on both axes. Covers an empty host list too.
    #[error("resource not available")]
    ResourceUnavailable,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown placement strategy: {0}")]
    UnknownStrategy(String),

    #[error("placement strategy already registered: {0}")]
    DuplicateStrategy(String),

    #[error("failed to initialize strategy {strategy}: {reason}")]
    Initialization { strategy: String, reason: String },
}

pub type PlacementResult<T> = Result<T, PlacementError>;
