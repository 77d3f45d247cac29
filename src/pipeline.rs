//! One release-notes run over a pull request.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::action::ActionContext;
use crate::data::PullRequestRef;
use crate::github::{CommentSink, CommitSource, COMMIT_LIMIT};
use crate::notes::{
    compose, extract_last_release_message, resolve_issue_ids, to_chat_code_block,
    IssueIdPattern, DEFAULT_ISSUE_PREFIX, DEFAULT_LABEL_PRIORITY,
};
use crate::tracker::IssueTracker;

/// Line prepended to the comment when the commit listing hit the host ceiling.
pub const TRUNCATION_WARNING: &str = concat!(
    "⚠️ This pull request has 250 or more commits; ",
    "only the first 250 were scanned, so these release notes may be incomplete."
);

/// Options of a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Matcher for issue references in commit messages.
    pub issue_pattern: IssueIdPattern,
    /// Issue-type labels, most preferred first.
    pub label_priority: Vec<String>,
    /// Print the comment instead of posting it.
    pub dry_run: bool,
}

impl RunConfig {
    /// Builds a config for issue keys with `prefix` and default labels.
    pub fn new(prefix: &str) -> Result<Self> {
        let issue_pattern = IssueIdPattern::new(prefix)
            .with_context(|| format!("Invalid issue prefix: {prefix}"))?;
        Ok(Self {
            issue_pattern,
            label_priority: DEFAULT_LABEL_PRIORITY.map(str::to_string).to_vec(),
            dry_run: false,
        })
    }

    /// Sets dry-run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        #[allow(clippy::unwrap_used)] // Constant prefix always forms a valid pattern
        let issue_pattern = IssueIdPattern::new(DEFAULT_ISSUE_PREFIX).unwrap();
        Self {
            issue_pattern,
            label_priority: DEFAULT_LABEL_PRIORITY.map(str::to_string).to_vec(),
            dry_run: false,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No commit referenced an issue.
    NoIssues,
    /// Issues were referenced but none could be turned into content.
    NothingToPost,
    /// The comment was posted.
    Posted {
        /// Identifiers included in the comment, in order.
        issues: Vec<String>,
        /// Whether the truncation warning was added.
        truncated: bool,
    },
    /// Dry run: the comment that would have been posted.
    DryRun {
        /// Comment body.
        body: String,
    },
}

/// Prefixes `body` with the truncation warning and a blank line.
pub fn with_truncation_warning(body: &str) -> String {
    format!("{TRUNCATION_WARNING}\n\n{body}")
}

fn set_outputs(ctx: &dyn ActionContext, issues: &[String], body: &str) -> Result<()> {
    ctx.set_output("issues", &issues.join(","))?;
    ctx.set_output("comment", body)?;
    ctx.set_output("chat-message", &to_chat_code_block(body))?;
    Ok(())
}

/// Runs the pipeline for `pr`.
///
/// Issue lookups that fail are reported through `ctx` and skipped, as are
/// output failures after the comment is posted. Any other failure aborts the
/// run before anything is posted.
pub async fn run(
    ctx: &dyn ActionContext,
    pr: &PullRequestRef,
    commits: &dyn CommitSource,
    tracker: &dyn IssueTracker,
    sink: &dyn CommentSink,
    config: &RunConfig,
) -> Result<RunOutcome> {
    let listing = commits
        .list_commits(pr)
        .await
        .with_context(|| format!("Failed to list commits of {pr}"))?;
    ctx.debug(&format!("Fetched {} commits from {pr}", listing.messages.len()));

    let ids = resolve_issue_ids(&listing.messages, &config.issue_pattern);
    if ids.is_empty() {
        ctx.info("No issue references found in commit messages, nothing to post");
        return Ok(RunOutcome::NoIssues);
    }
    ctx.info(&format!("Found issue references: {}", ids.join(", ")));

    let mut issues = Vec::with_capacity(ids.len());
    for id in &ids {
        match tracker.fetch_issue(id).await {
            Ok(issue) => {
                debug!(identifier = %id, "Fetched issue");
                issues.push(issue);
            }
            Err(err) => {
                warn!(identifier = %id, error = %err, "Skipping issue that could not be fetched");
                ctx.error(&format!("Failed to fetch issue {id}: {err:#}"));
            }
        }
    }

    let body = compose(&issues, extract_last_release_message, &config.label_priority);
    if body.is_empty() {
        ctx.info("No release notes could be composed, nothing to post");
        return Ok(RunOutcome::NothingToPost);
    }

    let body = if listing.truncated {
        ctx.warning(&format!(
            "Commit listing reached the {COMMIT_LIMIT}-commit limit; release notes may be incomplete"
        ));
        with_truncation_warning(&body)
    } else {
        body
    };

    let included: Vec<String> = issues.into_iter().map(|i| i.identifier).collect();

    if config.dry_run {
        ctx.info(&body);
        set_outputs(ctx, &included, &body)?;
        return Ok(RunOutcome::DryRun { body });
    }

    sink.post_comment(pr, &body)
        .await
        .with_context(|| format!("Failed to post release notes comment on {pr}"))?;

    // The comment is already published; an output failure no longer fails the run
    if let Err(err) = set_outputs(ctx, &included, &body) {
        warn!(pull_request = %pr, error = %err, "Failed to set outputs after posting");
        ctx.error(&format!(
            "Release notes were posted but setting outputs failed: {err:#}"
        ));
    }

    info!(pull_request = %pr, issues = included.len(), "Release notes posted");
    ctx.info(&format!("Posted release notes for {} issue(s)", included.len()));

    Ok(RunOutcome::Posted {
        issues: included,
        truncated: listing.truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        issue, pull_request, LogLevel, MockTracker, RecordingContext, RecordingSink,
        StaticCommits,
    };

    fn tracker() -> MockTracker {
        MockTracker::default()
            .with_issue(issue(
                "HK-1",
                "Fix \u{201C}sync\u{201D} crash",
                Some("Notes A\n---Release---\nFirst\n---Release---\nSecond"),
                &["feature", "bug"],
            ))
            .with_issue(issue("HK-2", "Add export", None, &["Feature"]))
            .with_issue(issue("HK-3", "Tidy logs", Some("No notes here"), &[]))
    }

    async fn run_with(
        ctx: &RecordingContext,
        commits: &StaticCommits,
        tracker: &MockTracker,
        sink: &RecordingSink,
    ) -> Result<RunOutcome> {
        run(
            ctx,
            &pull_request(),
            commits,
            tracker,
            sink,
            &RunConfig::default(),
        )
        .await
    }

    #[tokio::test]
    async fn posts_deduplicated_notes_in_commit_order() -> Result<()> {
        let ctx = RecordingContext::default();
        let commits = StaticCommits::new(
            &["[HK-1] fix", "other change", "[HK-1] fix again", "[HK-2] add"],
            false,
        );
        let tracker = tracker();
        let sink = RecordingSink::default();

        let outcome = run_with(&ctx, &commits, &tracker, &sink).await?;

        assert_eq!(
            outcome,
            RunOutcome::Posted {
                issues: vec!["HK-1".to_string(), "HK-2".to_string()],
                truncated: false,
            }
        );
        assert_eq!(tracker.requested(), vec!["HK-1", "HK-2"]);
        assert_eq!(
            sink.posted(),
            vec![
                "**TECH (bug)**: Fix \"sync\" crash\n\
                 Second\n\
                 Link: https://linear.app/acme/issue/HK-1\n\
                 \n\
                 **TECH (feature)**: Add export\n\
                 Link: https://linear.app/acme/issue/HK-2\n\n"
                    .to_string()
            ]
        );
        assert_eq!(ctx.output("issues").as_deref(), Some("HK-1,HK-2"));
        Ok(())
    }

    #[tokio::test]
    async fn no_references_skips_everything() -> Result<()> {
        let ctx = RecordingContext::default();
        let commits = StaticCommits::new(&["chore: bump deps", "fix typo [HK-1]"], false);
        let tracker = tracker();
        let sink = RecordingSink::default();

        let outcome = run_with(&ctx, &commits, &tracker, &sink).await?;

        assert_eq!(outcome, RunOutcome::NoIssues);
        assert!(tracker.requested().is_empty());
        assert!(sink.posted().is_empty());
        assert!(ctx.output("comment").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn failed_lookup_is_skipped() -> Result<()> {
        let ctx = RecordingContext::default();
        let commits = StaticCommits::new(&["[HK-404] gone", "[HK-3] tidy"], false);
        let tracker = tracker();
        let sink = RecordingSink::default();

        let outcome = run_with(&ctx, &commits, &tracker, &sink).await?;

        assert_eq!(
            outcome,
            RunOutcome::Posted {
                issues: vec!["HK-3".to_string()],
                truncated: false,
            }
        );
        assert_eq!(tracker.requested(), vec!["HK-404", "HK-3"]);
        let posted = sink.posted();
        assert_eq!(posted.len(), 1);
        assert!(!posted[0].contains("HK-404"));
        let errors = ctx.logs(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("HK-404"));
        Ok(())
    }

    #[tokio::test]
    async fn all_lookups_failing_posts_nothing() -> Result<()> {
        let ctx = RecordingContext::default();
        let commits = StaticCommits::new(&["[HK-8] a", "[HK-9] b"], false);
        let tracker = MockTracker::default();
        let sink = RecordingSink::default();

        let outcome = run_with(&ctx, &commits, &tracker, &sink).await?;

        assert_eq!(outcome, RunOutcome::NothingToPost);
        assert!(sink.posted().is_empty());
        assert_eq!(ctx.logs(LogLevel::Error).len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn truncated_listing_adds_warning() -> Result<()> {
        let ctx = RecordingContext::default();
        let commits = StaticCommits::new(&["[HK-2] add"], true);
        let tracker = tracker();
        let sink = RecordingSink::default();

        let outcome = run_with(&ctx, &commits, &tracker, &sink).await?;

        assert!(matches!(outcome, RunOutcome::Posted { truncated: true, .. }));
        let posted = sink.posted();
        assert!(posted[0].starts_with(&format!("{TRUNCATION_WARNING}\n\n**TECH")));
        assert_eq!(ctx.logs(LogLevel::Warning).len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn commit_listing_failure_is_fatal() {
        let ctx = RecordingContext::default();
        let commits = StaticCommits::failing();
        let tracker = tracker();
        let sink = RecordingSink::default();

        let err = run_with(&ctx, &commits, &tracker, &sink).await.unwrap_err();

        assert!(err.to_string().contains("Failed to list commits of acme/widgets#7"));
        assert!(tracker.requested().is_empty());
    }

    #[tokio::test]
    async fn posting_failure_is_fatal() {
        let ctx = RecordingContext::default();
        let commits = StaticCommits::new(&["[HK-2] add"], false);
        let tracker = tracker();
        let sink = RecordingSink::failing();

        let err = run_with(&ctx, &commits, &tracker, &sink).await.unwrap_err();

        assert!(format!("{err:#}").contains("comment rejected"));
        assert!(ctx.output("comment").is_none());
    }

    #[tokio::test]
    async fn output_failure_after_posting_is_not_fatal() -> Result<()> {
        let ctx = RecordingContext::failing_outputs();
        let commits = StaticCommits::new(&["[HK-2] add"], false);
        let tracker = tracker();
        let sink = RecordingSink::default();

        let outcome = run_with(&ctx, &commits, &tracker, &sink).await?;

        assert!(matches!(outcome, RunOutcome::Posted { .. }));
        assert_eq!(sink.posted().len(), 1);
        assert!(ctx.failure().is_none());
        let errors = ctx.logs(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("setting outputs failed"));
        Ok(())
    }

    #[tokio::test]
    async fn output_failure_in_dry_run_is_fatal() {
        let ctx = RecordingContext::failing_outputs();
        let commits = StaticCommits::new(&["[HK-2] add"], false);
        let tracker = tracker();
        let sink = RecordingSink::default();
        let config = RunConfig::default().dry_run(true);

        let result = run(&ctx, &pull_request(), &commits, &tracker, &sink, &config).await;

        assert!(result.is_err());
        assert!(sink.posted().is_empty());
    }

    #[test]
    fn truncation_warning_names_the_commit_limit() {
        let limit = COMMIT_LIMIT.to_string();
        assert_eq!(TRUNCATION_WARNING.matches(limit.as_str()).count(), 2);
    }

    #[tokio::test]
    async fn dry_run_does_not_post() -> Result<()> {
        let ctx = RecordingContext::default();
        let commits = StaticCommits::new(&["[HK-3] tidy"], false);
        let tracker = tracker();
        let sink = RecordingSink::default();
        let config = RunConfig::default().dry_run(true);

        let outcome = run(&ctx, &pull_request(), &commits, &tracker, &sink, &config).await?;

        let RunOutcome::DryRun { body } = outcome else {
            panic!("expected dry run outcome");
        };
        assert_eq!(
            body,
            "**TECH**: Tidy logs\nLink: https://linear.app/acme/issue/HK-3\n\n"
        );
        assert!(sink.posted().is_empty());
        assert_eq!(
            ctx.output("chat-message").as_deref(),
            Some("```*TECH*: Tidy logs\nLink: https://linear.app/acme/issue/HK-3\n\n```")
        );
        Ok(())
    }

    #[tokio::test]
    async fn custom_prefix() -> Result<()> {
        let ctx = RecordingContext::default();
        let commits = StaticCommits::new(&["[HK-2] ignored", "[OPS-2] used"], false);
        let tracker = MockTracker::default().with_issue(issue("OPS-2", "Rotate keys", None, &[]));
        let sink = RecordingSink::default();
        let config = RunConfig::new("OPS")?;

        let outcome = run(&ctx, &pull_request(), &commits, &tracker, &sink, &config).await?;

        assert_eq!(
            outcome,
            RunOutcome::Posted {
                issues: vec!["OPS-2".to_string()],
                truncated: false,
            }
        );
        assert_eq!(tracker.requested(), vec!["OPS-2"]);
        Ok(())
    }
}
