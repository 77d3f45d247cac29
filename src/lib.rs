//! # release-notes-bot
//!
//! Collects the release notes of the issues a pull request references and
//! posts them on the pull request as a single comment.
//!
//! Commit messages of the form `[HK-123] Fix login` are resolved to issue
//! identifiers, each issue is fetched from the tracker, the last
//! `---Release---` section of its description becomes its release message
//! and the composed comment is posted once.
//!
//! ## Quick Start
//!
//! ```rust
//! use release_notes_bot::notes::{extract_last_release_message, to_chat_code_block};
//!
//! let description = "Context\n---Release---\nLogin no longer times out.";
//! assert_eq!(
//!     extract_last_release_message(Some(description)).as_deref(),
//!     Some("Login no longer times out.")
//! );
//! assert_eq!(to_chat_code_block("**TECH**: x"), "```*TECH*: x```");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod action;
pub mod cli;
pub mod data;
pub mod github;
pub(crate) mod http;
pub mod notes;
pub mod pipeline;
pub mod tracker;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use crate::cli::Cli;

/// The current version of release-notes-bot.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
