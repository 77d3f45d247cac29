//! Issue-tracker error handling.

use thiserror::Error;

/// Issue-tracker API errors.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The tracker returned a non-success status.
    #[error("Issue tracker request failed: {0}")]
    ApiRequestFailed(String),

    /// The GraphQL layer reported errors.
    #[error("Issue tracker query failed: {0}")]
    QueryFailed(String),

    /// No issue exists with the identifier.
    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    /// Response payload did not have the expected shape.
    #[error("Invalid response format from issue tracker: {0}")]
    InvalidResponseFormat(String),

    /// Network connectivity error.
    #[error("Network error: {0}")]
    NetworkError(String),
}
