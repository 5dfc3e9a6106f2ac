use perch_core::{EventOutcome, PerchError, PullRequestEvent};
use tracing::{debug, info};

use crate::github::SourceHost;
use crate::llm::ReviewModel;
use crate::prompt::{self, NO_ISSUES_SENTINEL};
use crate::rules::RuleAggregator;

/// Fixed header prepended to every published review comment.
pub const COMMENT_HEADER: &str = "### \u{1f916} AI Code Review\n\n";

/// Drives one event through the full flow:
/// rules → diff → prompt → model → publish decision.
///
/// The pipeline holds no per-event state; each call to
/// [`handle`](Self::handle) is an independent pass, so concurrent events
/// never interact. Re-delivering the same event posts a second comment by
/// design (no deduplication).
pub struct ReviewPipeline<H, M> {
    host: H,
    model: M,
    aggregator: RuleAggregator,
}

impl<H: SourceHost, M: ReviewModel> ReviewPipeline<H, M> {
    /// Assemble a pipeline from its collaborators.
    pub fn new(host: H, model: M, aggregator: RuleAggregator) -> Self {
        Self {
            host,
            model,
            aggregator,
        }
    }

    /// Handle one pull-request-opened event to completion.
    ///
    /// Returns the terminal outcome for successful passes. Any fatal step
    /// (mandatory rules missing, diff unfetchable, review generation
    /// failure, publish failure) surfaces as an error; the caller at the
    /// event boundary logs it and records the event as failed. Partial
    /// side effects are not rolled back and nothing is retried.
    pub async fn handle(&self, event: &PullRequestEvent) -> Result<EventOutcome, PerchError> {
        let rules = self.aggregator.aggregate(&self.host, event).await?;
        debug!(%event, central = rules.central.is_found(), local = rules.local.is_found(),
            "rules aggregated");

        let diff = self
            .host
            .fetch_diff(&event.owner, &event.repo, event.number)
            .await?;
        debug!(%event, diff_bytes = diff.len(), "diff fetched");

        let prompt = prompt::build_review_prompt(&rules, &diff);
        let review = self.model.generate(&prompt).await?;

        if !is_actionable(&review) {
            info!(%event, "no issues found or empty response, skipping comment");
            return Ok(EventOutcome::Skipped);
        }

        let body = format!("{COMMENT_HEADER}{review}");
        self.host
            .post_comment(&event.owner, &event.repo, event.number, &body)
            .await?;
        info!(%event, "review comment published");
        Ok(EventOutcome::Published)
    }
}

/// Whether a review result warrants a comment.
///
/// A comment is published iff the trimmed text is non-empty and not
/// exactly the [`NO_ISSUES_SENTINEL`].
///
/// # Examples
///
/// ```
/// use perch_review::pipeline::is_actionable;
///
/// assert!(!is_actionable("LGTM!"));
/// assert!(!is_actionable("  \n"));
/// assert!(is_actionable("Remove the hardcoded secret."));
/// ```
pub fn is_actionable(review: &str) -> bool {
    let trimmed = review.trim();
    !trimmed.is_empty() && trimmed != NO_ISSUES_SENTINEL
}
