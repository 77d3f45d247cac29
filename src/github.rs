//! GitHub integration: pull request commits, comments and event context.

pub mod client;
pub mod error;
pub mod event;

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;

use crate::data::{CommitListing, PullRequestRef};

pub use client::GithubClient;
pub use error::GithubError;
pub use event::discover_pull_request;

/// Default REST endpoint; GitHub Actions exposes the real one as `GITHUB_API_URL`.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Commits requested per page.
pub const COMMITS_PER_PAGE: usize = 100;

/// Most commits the pull request commits endpoint will ever return.
pub const COMMIT_LIMIT: usize = 250;

/// Source of the commit messages of a pull request.
pub trait CommitSource: Send + Sync {
    /// Lists the commit messages of `pr`, flagging whether the host capped them.
    fn list_commits<'a>(
        &'a self,
        pr: &'a PullRequestRef,
    ) -> Pin<Box<dyn Future<Output = Result<CommitListing>> + Send + 'a>>;
}

/// Destination of the composed comment.
pub trait CommentSink: Send + Sync {
    /// Attaches `body` to `pr` as a new comment.
    fn post_comment<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        body: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}
