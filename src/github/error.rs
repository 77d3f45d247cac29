//! GitHub-specific error handling.

use thiserror::Error;

/// GitHub API specific errors.
#[derive(Error, Debug)]
pub enum GithubError {
    /// GitHub returned a non-success status.
    #[error("GitHub API request failed: {0}")]
    ApiRequestFailed(String),

    /// Response body did not have the expected shape.
    #[error("Invalid response format from GitHub API: {0}")]
    InvalidResponseFormat(String),

    /// Network connectivity error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The configured API URL could not be used.
    #[error("Invalid GitHub API URL: {0}")]
    InvalidUrl(String),
}
