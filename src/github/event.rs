//! Pull request discovery from the GitHub Actions environment.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::action::ActionError;
use crate::data::PullRequestRef;

/// Parts of a webhook event payload that identify a pull request.
#[derive(Deserialize)]
struct EventPayload {
    #[serde(default)]
    pull_request: Option<PullRequestPayload>,
    #[serde(default)]
    number: Option<u64>,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    number: u64,
}

/// Reads the pull request number from a webhook event payload file.
///
/// Returns `Ok(None)` when the event does not concern a pull request.
pub fn pull_request_number_from_event(event_path: &Path) -> Result<Option<u64>> {
    let content = fs::read_to_string(event_path)
        .with_context(|| format!("Failed to read event payload: {}", event_path.display()))?;

    let payload: EventPayload = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse event payload: {}", event_path.display()))?;

    Ok(payload
        .pull_request
        .map(|pr| pr.number)
        .or(payload.number))
}

/// Determines which pull request the run targets.
///
/// Explicit values win; otherwise the repository comes from
/// `GITHUB_REPOSITORY` and the number from the payload at `GITHUB_EVENT_PATH`.
pub fn discover_pull_request(
    repository: Option<&str>,
    number: Option<u64>,
) -> Result<PullRequestRef> {
    let env_repository = std::env::var("GITHUB_REPOSITORY").ok();
    let event_path = std::env::var_os("GITHUB_EVENT_PATH");

    resolve_pull_request(
        repository.or(env_repository.as_deref()),
        number,
        event_path.as_deref().map(Path::new),
    )
}

/// Combines the pieces of pull request context gathered by the caller.
pub(crate) fn resolve_pull_request(
    repository: Option<&str>,
    number: Option<u64>,
    event_path: Option<&Path>,
) -> Result<PullRequestRef> {
    let repository = repository
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| ActionError::MissingPullRequest("repository is not set".to_string()))?;

    let number = match number {
        Some(number) => number,
        None => {
            let event_path = event_path.ok_or_else(|| {
                ActionError::MissingPullRequest("no event payload available".to_string())
            })?;
            pull_request_number_from_event(event_path)?.ok_or_else(|| {
                ActionError::MissingPullRequest(
                    "the triggering event has no pull request".to_string(),
                )
            })?
        }
    };

    PullRequestRef::from_slug(repository, number)
        .ok_or_else(|| ActionError::InvalidRepository(repository.to_string()).into())
}
