//! Issue-tracker integration.

pub mod error;
pub mod linear;

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;

use crate::data::IssueRecord;

pub use error::TrackerError;
pub use linear::LinearClient;

/// Lookup of issue records by identifier.
pub trait IssueTracker: Send + Sync {
    /// Fetches the issue with the given identifier (e.g. `HK-123`).
    fn fetch_issue<'a>(
        &'a self,
        identifier: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<IssueRecord>> + Send + 'a>>;
}
