//! The `resolve` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::notes::{resolve_issue_ids, IssueIdPattern, DEFAULT_ISSUE_PREFIX};

/// Resolve command options.
#[derive(Parser)]
pub struct ResolveCommand {
    /// File with one commit message per line; reads standard input when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Issue key prefix.
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_ISSUE_PREFIX)]
    pub issue_prefix: String,
}

impl ResolveCommand {
    /// Executes the resolve command.
    pub fn execute(self) -> Result<()> {
        let input = super::read_input(self.file.as_deref())?;
        for id in self.resolve(&input)? {
            println!("{id}");
        }
        Ok(())
    }

    fn resolve(&self, input: &str) -> Result<Vec<String>> {
        let pattern = IssueIdPattern::new(&self.issue_prefix)
            .with_context(|| format!("Invalid issue prefix: {}", self.issue_prefix))?;
        Ok(resolve_issue_ids(input.lines(), &pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_one_message_per_line() -> Result<()> {
        let cmd = ResolveCommand {
            file: None,
            issue_prefix: DEFAULT_ISSUE_PREFIX.to_string(),
        };
        let ids = cmd.resolve("[HK-4] a\nno ref\n[HK-2] b\n[HK-4] c\n")?;
        assert_eq!(ids, vec!["HK-4", "HK-2"]);
        Ok(())
    }

    #[test]
    fn honours_prefix() -> Result<()> {
        let cmd = ResolveCommand {
            file: None,
            issue_prefix: "OPS".to_string(),
        };
        assert_eq!(cmd.resolve("[HK-1] a\n[OPS-12] b")?, vec!["OPS-12"]);
        Ok(())
    }
}
