//! The `extract` command.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::notes::extract_last_release_message;

/// Extract command options.
#[derive(Parser)]
pub struct ExtractCommand {
    /// File holding the issue description; reads standard input when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl ExtractCommand {
    /// Executes the extract command.
    pub fn execute(self) -> Result<()> {
        let description = super::read_input(self.file.as_deref())?;

        if !write_release_message(&description, &mut io::stdout().lock())? {
            eprintln!("No release message found");
        }
        Ok(())
    }
}

/// Writes the release message of `description` to `out`.
///
/// Returns false, writing nothing, when the description has none.
fn write_release_message(description: &str, out: &mut impl Write) -> Result<bool> {
    match extract_last_release_message(Some(description)) {
        Some(message) => {
            writeln!(out, "{message}")?;
            Ok(true)
        }
        None => Ok(false),
    }
}
