//! Release-note extraction and comment composition.
//!
//! Everything in this module is a pure transformation: no I/O, no logging,
//! no shared state. The orchestrator in [`crate::pipeline`] feeds it data
//! fetched by the collaborators.

pub mod compose;
pub mod extract;
pub mod resolve;

pub use compose::{compose, issue_type_tag, to_chat_code_block, DEFAULT_LABEL_PRIORITY};
pub use extract::{extract_last_release_message, release_sections};
pub use resolve::{resolve_issue_ids, IssueIdPattern, DEFAULT_ISSUE_PREFIX};
