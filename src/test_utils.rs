//! Shared test utilities.

use std::collections::HashMap;
use std::env;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use anyhow::Result;

use crate::action::{ActionContext, ActionError};
use crate::data::{CommitListing, IssueRecord, PullRequestRef};
use crate::github::{CommentSink, CommitSource};
use crate::tracker::IssueTracker;

/// Global lock so tests touching environment variables don't interfere.
static ENV_TEST_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Sets environment variables for the duration of a test and restores them
/// on drop.
pub(crate) struct EnvGuard {
    _lock: MutexGuard<'static, ()>,
    vars: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub(crate) fn new() -> Self {
        let lock = ENV_TEST_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Self {
            _lock: lock,
            vars: Vec::new(),
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &str) {
        self.vars.push((key.to_string(), env::var(key).ok()));
        env::set_var(key, value);
    }

    pub(crate) fn remove(&mut self, key: &str) {
        self.vars.push((key.to_string(), env::var(key).ok()));
        env::remove_var(key);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // Restore in reverse order
        for (key, original) in self.vars.drain(..).rev() {
            match original {
                Some(value) => env::set_var(&key, value),
                None => env::remove_var(&key),
            }
        }
    }
}

/// Severity of a recorded log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogLevel {
    Info,
    Debug,
    Warning,
    Error,
}

/// Context that keeps everything in memory for inspection.
#[derive(Default)]
pub(crate) struct RecordingContext {
    inputs: HashMap<String, String>,
    logs: Mutex<Vec<(LogLevel, String)>>,
    outputs: Mutex<Vec<(String, String)>>,
    failure: Mutex<Option<String>>,
    fail_outputs: bool,
}

impl RecordingContext {
    /// Context whose `set_output` always fails.
    pub(crate) fn failing_outputs() -> Self {
        Self {
            fail_outputs: true,
            ..Self::default()
        }
    }

    pub(crate) fn with_input(mut self, name: &str, value: &str) -> Self {
        self.inputs.insert(name.to_string(), value.to_string());
        self
    }

    pub(crate) fn logs(&self, level: LogLevel) -> Vec<String> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub(crate) fn output(&self, name: &str) -> Option<String> {
        self.outputs
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub(crate) fn failure(&self) -> Option<String> {
        self.failure.lock().unwrap().clone()
    }

    fn log(&self, level: LogLevel, message: &str) {
        self.logs.lock().unwrap().push((level, message.to_string()));
    }
}

impl ActionContext for RecordingContext {
    fn get_input(&self, name: &str) -> Option<String> {
        self.inputs
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn set_output(&self, name: &str, value: &str) -> Result<(), ActionError> {
        if self.fail_outputs {
            return Err(ActionError::OutputWrite {
                name: name.to_string(),
                source: std::io::Error::other("disk full"),
            });
        }
        self.outputs
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_failed(&self, error: &anyhow::Error) {
        *self.failure.lock().unwrap() = Some(format!("{error:#}"));
    }
}

/// Commit source returning a fixed listing.
pub(crate) struct StaticCommits {
    listing: Option<CommitListing>,
}

impl StaticCommits {
    pub(crate) fn new(messages: &[&str], truncated: bool) -> Self {
        Self {
            listing: Some(CommitListing {
                messages: messages.iter().map(|m| (*m).to_string()).collect(),
                truncated,
            }),
        }
    }

    /// Source whose listing always fails.
    pub(crate) fn failing() -> Self {
        Self { listing: None }
    }
}

impl CommitSource for StaticCommits {
    fn list_commits<'a>(
        &'a self,
        _pr: &'a PullRequestRef,
    ) -> Pin<Box<dyn Future<Output = Result<CommitListing>> + Send + 'a>> {
        let listing = self.listing.clone();
        Box::pin(async move { listing.ok_or_else(|| anyhow::anyhow!("commit listing failed")) })
    }
}

/// Issue tracker serving a fixed set of records and recording lookups.
///
/// Identifiers without a record fail with "not found".
#[derive(Default)]
pub(crate) struct MockTracker {
    issues: HashMap<String, IssueRecord>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockTracker {
    pub(crate) fn with_issue(mut self, issue: IssueRecord) -> Self {
        self.issues.insert(issue.identifier.clone(), issue);
        self
    }

    /// Identifiers looked up so far, in call order.
    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl IssueTracker for MockTracker {
    fn fetch_issue<'a>(
        &'a self,
        identifier: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<IssueRecord>> + Send + 'a>> {
        Box::pin(async move {
            self.requested.lock().unwrap().push(identifier.to_string());
            self.issues
                .get(identifier)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Issue not found: {identifier}"))
        })
    }
}

/// Comment sink recording posted bodies.
#[derive(Default)]
pub(crate) struct RecordingSink {
    posted: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingSink {
    pub(crate) fn failing() -> Self {
        Self {
            posted: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) fn posted(&self) -> Vec<String> {
        self.posted.lock().unwrap().clone()
    }
}

impl CommentSink for RecordingSink {
    fn post_comment<'a>(
        &'a self,
        _pr: &'a PullRequestRef,
        body: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail {
                anyhow::bail!("comment rejected");
            }
            self.posted.lock().unwrap().push(body.to_string());
            Ok(())
        })
    }
}

/// Builds an issue record with a predictable URL.
pub(crate) fn issue(
    identifier: &str,
    title: &str,
    description: Option<&str>,
    labels: &[&str],
) -> IssueRecord {
    IssueRecord {
        identifier: identifier.to_string(),
        title: title.to_string(),
        url: format!("https://linear.app/acme/issue/{identifier}"),
        description: description.map(str::to_string),
        labels: labels.iter().map(|l| (*l).to_string()).collect(),
    }
}

/// Pull request used across tests.
pub(crate) fn pull_request() -> PullRequestRef {
    PullRequestRef {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        number: 7,
    }
}
