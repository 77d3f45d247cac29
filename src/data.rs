//! Data structures shared between the collaborators and the notes pipeline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An issue as read from the issue tracker.
///
/// Records only reach the notes pipeline after the tracker client has
/// validated the raw API payload, so every field here is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Tracker identifier (e.g. `HK-123`).
    pub identifier: String,
    /// Issue title as entered in the tracker.
    pub title: String,
    /// Browser URL of the issue.
    pub url: String,
    /// Free-form markdown description, absent when the issue has none.
    pub description: Option<String>,
    /// Label names attached to the issue.
    pub labels: BTreeSet<String>,
}

impl IssueRecord {
    /// Returns true if the issue carries `label`, ignoring ASCII case.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }
}

/// Flattened commit messages of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitListing {
    /// Commit messages in the order the host returned them.
    pub messages: Vec<String>,
    /// Whether the listing stopped at the host's result ceiling.
    pub truncated: bool,
}

/// Pull request the run operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Repository owner (user or organisation).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number.
    pub number: u64,
}

impl PullRequestRef {
    /// Builds a reference from an `owner/repo` slug.
    pub fn from_slug(slug: &str, number: u64) -> Option<Self> {
        let (owner, repo) = slug.trim().split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        })
    }
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
