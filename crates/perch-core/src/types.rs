use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder substituted when the central repository has no
/// repo-specific rules for the target repository.
pub const CENTRAL_RULES_PLACEHOLDER: &str =
    "No repository-specific rules found in the central config.";

/// Placeholder substituted when the target repository carries no
/// repo-specific rules of its own.
pub const LOCAL_RULES_PLACEHOLDER: &str =
    "No repository-specific rules found in the local repository.";

/// One pull-request-opened notification, reduced to the coordinates the
/// review pipeline needs.
///
/// Created on receipt of a webhook delivery, consumed within one handling
/// pass, and discarded after. Nothing persists across events.
///
/// # Examples
///
/// ```
/// use perch_core::PullRequestEvent;
///
/// let event = PullRequestEvent {
///     owner: "octocat".into(),
///     repo: "hello-world".into(),
///     number: 42,
/// };
/// assert_eq!(event.to_string(), "octocat/hello-world#42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestEvent {
    /// Repository owner login.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number.
    pub number: u64,
}

impl fmt::Display for PullRequestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Where a rule document was sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleProvenance {
    /// Mandatory rules from the central repository's fixed path.
    Global,
    /// Optional repo-specific rules held in the central repository.
    Central,
    /// Optional repo-specific rules held in the target repository itself.
    Local,
}

impl fmt::Display for RuleProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RuleProvenance::Global => "global",
            RuleProvenance::Central => "central",
            RuleProvenance::Local => "local",
        };
        f.write_str(label)
    }
}

/// A fetched (or absent) rule document.
///
/// Absence is a normal state for the two repo-specific documents, not an
/// error.
///
/// # Examples
///
/// ```
/// use perch_core::{RuleDocument, RuleProvenance};
///
/// let doc = RuleDocument::absent(RuleProvenance::Central);
/// assert!(!doc.is_found());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDocument {
    /// Which source this document came from.
    pub provenance: RuleProvenance,
    /// Decoded text content, `None` when the document was absent.
    pub content: Option<String>,
}

impl RuleDocument {
    /// A document that was found with the given text.
    pub fn found(provenance: RuleProvenance, content: impl Into<String>) -> Self {
        Self {
            provenance,
            content: Some(content.into()),
        }
    }

    /// A document that was not found (or treated as absent).
    pub fn absent(provenance: RuleProvenance) -> Self {
        Self {
            provenance,
            content: None,
        }
    }

    /// Whether the document carries content.
    pub fn is_found(&self) -> bool {
        self.content.is_some()
    }
}

/// Ordered concatenation of the three rule layers.
///
/// Order is fixed and significant: it frames precedence for the model, it
/// is not enforced programmatically. Optional slots render as explicit
/// placeholder strings when absent.
///
/// # Examples
///
/// ```
/// use perch_core::{AggregatedRules, RuleDocument, RuleProvenance};
///
/// let rules = AggregatedRules {
///     global: "No secrets in code.".into(),
///     central: RuleDocument::absent(RuleProvenance::Central),
///     local: RuleDocument::absent(RuleProvenance::Local),
/// };
/// let text = rules.render();
/// assert!(text.contains("GLOBAL RULES"));
/// assert!(text.contains("No repository-specific rules found in the central config."));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedRules {
    /// Mandatory global rules text.
    pub global: String,
    /// Optional repo-specific rules from the central repository.
    pub central: RuleDocument,
    /// Optional repo-specific rules from the target repository.
    pub local: RuleDocument,
}

impl AggregatedRules {
    /// Render the layered rules document with labeled section headers.
    pub fn render(&self) -> String {
        format!(
            "--- GLOBAL RULES (Apply to all repositories) ---\n{}\n\n\
             --- REPOSITORY-SPECIFIC RULES (From Central Config) ---\n{}\n\n\
             --- REPOSITORY-SPECIFIC RULES (From Local Repo) ---\n{}\n\n\
             --- END OF RULES ---",
            self.global,
            self.central.content.as_deref().unwrap_or(CENTRAL_RULES_PLACEHOLDER),
            self.local.content.as_deref().unwrap_or(LOCAL_RULES_PLACEHOLDER),
        )
    }
}

/// Terminal state of one event's handling pass.
///
/// `received → rules-aggregated → diff-fetched → review-requested` is
/// implicit in the pipeline's control flow; only the terminal state is
/// materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// A review comment was posted on the pull request.
    Published,
    /// The model reported no actionable feedback; nothing was posted.
    Skipped,
    /// A fatal step aborted the event; nothing was posted.
    Failed,
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventOutcome::Published => "published",
            EventOutcome::Skipped => "skipped",
            EventOutcome::Failed => "failed",
        };
        f.write_str(label)
    }
}
