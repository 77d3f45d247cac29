//! GitHub Actions implementation of the host context.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use tracing::debug;
use uuid::Uuid;

use super::{ActionContext, ActionError};

/// Host context backed by the GitHub Actions runner protocol.
///
/// Inputs come from `INPUT_<NAME>` environment variables, log lines are
/// workflow commands on stdout and outputs are appended to the file named
/// by `GITHUB_OUTPUT`.
#[derive(Debug, Default)]
pub struct GithubActionsContext {
    output_file: Option<PathBuf>,
}

impl GithubActionsContext {
    /// Creates a context from the runner environment.
    pub fn from_env() -> Self {
        Self {
            output_file: env::var_os("GITHUB_OUTPUT")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Creates a context that writes outputs to `path`.
    pub fn with_output_file(path: PathBuf) -> Self {
        Self {
            output_file: Some(path),
        }
    }
}

/// Environment variable carrying an input.
fn input_variable(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Escapes a workflow command payload.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Random heredoc delimiter; output values carry user-written text.
fn output_delimiter() -> String {
    format!("ghadelimiter_{}", Uuid::new_v4())
}

/// Formats an output entry in the multi-line file syntax.
fn output_entry(name: &str, value: &str, delimiter: &str) -> Result<String, ActionError> {
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(ActionError::OutputDelimiterCollision(name.to_string()));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

impl ActionContext for GithubActionsContext {
    fn get_input(&self, name: &str) -> Option<String> {
        env::var(input_variable(name))
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn debug(&self, message: &str) {
        println!("::debug::{}", escape_data(message));
    }

    fn warning(&self, message: &str) {
        println!("::warning::{}", escape_data(message));
    }

    fn error(&self, message: &str) {
        println!("::error::{}", escape_data(message));
    }

    fn set_output(&self, name: &str, value: &str) -> Result<(), ActionError> {
        let Some(path) = &self.output_file else {
            debug!(output = name, "GITHUB_OUTPUT is not set, dropping output");
            return Ok(());
        };

        let entry = output_entry(name, value, &output_delimiter())?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(entry.as_bytes()))
            .map_err(|source| ActionError::OutputWrite {
                name: name.to_string(),
                source,
            })
    }

    fn set_failed(&self, error: &anyhow::Error) {
        self.error(&format!("{error:#}"));
    }
}
