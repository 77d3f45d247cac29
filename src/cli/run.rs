//! The `run` command: the full release-notes pipeline.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::action::{ActionContext, ActionError, GithubActionsContext};
use crate::github::{self, discover_pull_request, GithubClient};
use crate::notes::DEFAULT_ISSUE_PREFIX;
use crate::pipeline::{self, RunConfig, RunOutcome};
use crate::tracker::{linear, LinearClient};
use crate::utils::settings::{get_env_var, get_env_vars};

/// Environment fallbacks for the GitHub token input.
const GITHUB_TOKEN_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// Environment fallbacks for the tracker token input.
const TRACKER_TOKEN_VARS: &[&str] = &["LINEAR_API_KEY"];

/// Run command options.
#[derive(Parser)]
pub struct RunCommand {
    /// Repository as owner/repo (defaults to GITHUB_REPOSITORY).
    #[arg(long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Pull request number (defaults to the triggering event).
    #[arg(long, value_name = "NUMBER")]
    pub pr: Option<u64>,

    /// Issue key prefix (overrides the issue-prefix input).
    #[arg(long, value_name = "PREFIX")]
    pub issue_prefix: Option<String>,

    /// Prints the comment instead of posting it.
    #[arg(long)]
    pub dry_run: bool,

    /// GitHub REST API base URL (defaults to GITHUB_API_URL).
    #[arg(long, value_name = "URL")]
    pub github_api_url: Option<String>,

    /// Linear GraphQL endpoint (defaults to LINEAR_API_URL).
    #[arg(long, value_name = "URL")]
    pub linear_api_url: Option<String>,
}

impl RunCommand {
    /// Executes the run command in the GitHub Actions host.
    pub async fn execute(self) -> Result<()> {
        let ctx = GithubActionsContext::from_env();
        self.execute_in(&ctx).await
    }

    /// Runs against `ctx`, turning a failure into
    /// [`ActionError::AlreadyReported`] once the context has recorded it.
    pub(crate) async fn execute_in(&self, ctx: &dyn ActionContext) -> Result<()> {
        self.run_in(ctx)
            .await
            .map(|_| ())
            .map_err(|_| ActionError::AlreadyReported.into())
    }

    /// Runs against an arbitrary host context.
    ///
    /// A failure is reported once through [`ActionContext::set_failed`]
    /// before being returned.
    pub async fn run_in(&self, ctx: &dyn ActionContext) -> Result<RunOutcome> {
        match self.run_pipeline(ctx).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                ctx.set_failed(&err);
                Err(err)
            }
        }
    }

    async fn run_pipeline(&self, ctx: &dyn ActionContext) -> Result<RunOutcome> {
        let github_token = credential(ctx, "github-token", GITHUB_TOKEN_VARS)?;
        let tracker_token = credential(ctx, "tracker-token", TRACKER_TOKEN_VARS)?;

        let prefix = self
            .issue_prefix
            .clone()
            .or_else(|| ctx.get_input("issue-prefix"))
            .unwrap_or_else(|| DEFAULT_ISSUE_PREFIX.to_string());
        let dry_run = self.dry_run || ctx.bool_input("dry-run").unwrap_or(false);
        let config = RunConfig::new(&prefix)?.dry_run(dry_run);

        let pr = discover_pull_request(self.repo.as_deref(), self.pr)?;
        ctx.info(&format!("Collecting release notes for {pr}"));

        let github_api_url = endpoint(
            self.github_api_url.as_deref(),
            "GITHUB_API_URL",
            github::DEFAULT_API_URL,
        );
        let linear_api_url = endpoint(
            self.linear_api_url.as_deref(),
            "LINEAR_API_URL",
            linear::DEFAULT_API_URL,
        );
        debug!(
            github_api_url = %github_api_url,
            linear_api_url = %linear_api_url,
            "Resolved endpoints"
        );

        let github = GithubClient::new(github_token, github_api_url)?;
        let tracker = LinearClient::new(tracker_token, linear_api_url)?;

        pipeline::run(ctx, &pr, &github, &tracker, &github, &config).await
    }
}

/// Returns a required credential from its input or the environment.
fn credential(ctx: &dyn ActionContext, input: &str, env_vars: &[&str]) -> Result<String> {
    ctx.required_input(input)
        .or_else(|missing| get_env_vars(env_vars).map_err(|_| missing))
        .map_err(Into::into)
}

/// Returns an endpoint from the flag, the environment, or the default.
fn endpoint(flag: Option<&str>, env_var: &str, default: &str) -> String {
    flag.map(str::to_string)
        .or_else(|| get_env_var(env_var).ok())
        .unwrap_or_else(|| default.to_string())
}
