//! Host context injected into the orchestrator.
//!
//! The orchestrator never reads process-wide state directly; inputs, log
//! lines, outputs and the terminal failure all go through an
//! [`ActionContext`]. [`GithubActionsContext`] is the implementation used
//! when running inside a GitHub Actions job.

pub mod github_actions;

use thiserror::Error;

pub use github_actions::GithubActionsContext;

/// Errors raised while reading the host context.
#[derive(Error, Debug)]
pub enum ActionError {
    /// A required input was not supplied.
    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    /// The run is not attached to a pull request.
    #[error("No pull request context: {0}")]
    MissingPullRequest(String),

    /// The repository slug is not of the form `owner/repo`.
    #[error("Invalid repository '{0}', expected owner/repo")]
    InvalidRepository(String),

    /// An output value contains the delimiter used to write it.
    #[error("Output '{0}' contains the output file delimiter")]
    OutputDelimiterCollision(String),

    /// The run failed and the failure was already reported through
    /// [`ActionContext::set_failed`].
    #[error("Run failed")]
    AlreadyReported,

    /// Writing to the output file failed.
    #[error("Failed to write action output '{name}': {source}")]
    OutputWrite {
        /// Output name.
        name: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Inputs, logging and outputs of the invoking host.
pub trait ActionContext: Send + Sync {
    /// Returns the trimmed value of an input, or `None` when unset or blank.
    fn get_input(&self, name: &str) -> Option<String>;

    /// Writes an informational line to the job log.
    fn info(&self, message: &str);

    /// Writes a debug line, shown only when step debugging is enabled.
    fn debug(&self, message: &str);

    /// Writes a warning annotation.
    fn warning(&self, message: &str);

    /// Writes an error annotation without failing the run.
    fn error(&self, message: &str);

    /// Sets a step output.
    fn set_output(&self, name: &str, value: &str) -> Result<(), ActionError>;

    /// Marks the run as failed with `error`.
    fn set_failed(&self, error: &anyhow::Error);

    /// Returns the value of an input that must be present.
    fn required_input(&self, name: &str) -> Result<String, ActionError> {
        self.get_input(name)
            .ok_or_else(|| ActionError::MissingInput(name.to_string()))
    }

    /// Returns an input parsed as a boolean (`true`/`false`, any case).
    fn bool_input(&self, name: &str) -> Option<bool> {
        self.get_input(name).and_then(|value| parse_bool_string(&value))
    }
}

/// Returns true if `error` was already reported to the host context.
pub fn is_already_reported(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<ActionError>(),
        Some(ActionError::AlreadyReported)
    )
}

/// Parses the YAML 1.2 core-schema boolean spellings accepted by actions.
pub fn parse_bool_string(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}
