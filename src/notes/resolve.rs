//! Issue reference resolution from commit messages.

use std::collections::HashSet;

use regex::Regex;

/// Issue key prefix used when none is configured.
pub const DEFAULT_ISSUE_PREFIX: &str = "HK";

/// Matcher for a bracketed issue reference at the very start of a commit
/// message, e.g. `[HK-123] Fix login`.
#[derive(Debug, Clone)]
pub struct IssueIdPattern {
    regex: Regex,
}

impl IssueIdPattern {
    /// Builds a matcher for issue keys of the form `<prefix>-<digits>`.
    ///
    /// The prefix is matched literally and case-sensitively.
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let pattern = format!(r"^\[({}-[0-9]+)\]", regex::escape(prefix.trim()));
        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    /// Returns the issue key a commit message starts with, if any.
    pub fn issue_id<'m>(&self, message: &'m str) -> Option<&'m str> {
        self.regex
            .captures(message)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
    }
}

/// Extracts the issue keys referenced by `messages`.
///
/// Only a reference at the start of a message counts. Duplicates are dropped
/// and the result keeps the order in which each key was first seen, so
/// identical input always produces identical output.
pub fn resolve_issue_ids<I, S>(messages: I, pattern: &IssueIdPattern) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for message in messages {
        if let Some(id) = pattern.issue_id(message.as_ref()) {
            if seen.insert(id.to_string()) {
                ids.push(id.to_string());
            }
        }
    }

    ids
}
