//! CLI interface for release-notes-bot.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

pub mod extract;
pub mod resolve;
pub mod run;

pub use extract::ExtractCommand;
pub use resolve::ResolveCommand;
pub use run::RunCommand;

/// release-notes-bot: collects release notes for a pull request.
#[derive(Parser)]
#[command(name = "release-notes-bot")]
#[command(
    about = "Posts release notes of the issues referenced by a pull request",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Composes and posts the release notes comment for a pull request.
    Run(RunCommand),
    /// Prints the release message of an issue description.
    Extract(ExtractCommand),
    /// Prints the issue identifiers referenced by commit messages.
    Resolve(ResolveCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(run_cmd) => run_cmd.execute().await,
            Commands::Extract(extract_cmd) => extract_cmd.execute(),
            Commands::Resolve(resolve_cmd) => resolve_cmd.execute(),
        }
    }
}

/// Reads `path`, or standard input when `path` is absent or `-`.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read standard input")?;
            Ok(content)
        }
    }
}
