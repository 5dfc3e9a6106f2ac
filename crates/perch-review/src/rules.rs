use perch_core::{
    AggregatedRules, CentralConfig, PerchError, PullRequestEvent, RuleDocument, RuleProvenance,
    RulesConfig,
};
use tracing::{debug, warn};

use crate::github::SourceHost;

/// Deterministic name of a repository's optional rules file.
///
/// # Examples
///
/// ```
/// use perch_review::rules::repo_rules_filename;
///
/// assert_eq!(repo_rules_filename("hello-world"), ".hello-world.md");
/// ```
pub fn repo_rules_filename(repo: &str) -> String {
    format!(".{repo}.md")
}

/// Assembles the layered rules document for one event.
///
/// Three fetches against the source host: the mandatory global rules from
/// the central repository's fixed path, then two independent optional
/// repo-specific documents (central repository and the PR's own
/// repository). Optional absence is normal; optional transient errors are
/// logged and treated as absence. Only the global fetch can fail the
/// event.
pub struct RuleAggregator {
    central_owner: String,
    central_repo: String,
    global_path: String,
}

impl RuleAggregator {
    /// Build an aggregator from explicit configuration.
    ///
    /// The central coordinate and global path are injected here rather
    /// than read from ambient state, so tests can point the aggregator at
    /// fake sources.
    pub fn new(central: &CentralConfig, rules: &RulesConfig) -> Self {
        Self {
            central_owner: central.owner.clone(),
            central_repo: central.repo.clone(),
            global_path: rules.global_path.clone(),
        }
    }

    /// Produce the [`AggregatedRules`] for the event's repository.
    ///
    /// The two optional fetches run concurrently; both resolve (to content
    /// or absence) before aggregation completes.
    ///
    /// # Errors
    ///
    /// Returns [`PerchError::GitHub`] when the mandatory global rules are
    /// absent or unfetchable. Review rules are mandatory, so this aborts
    /// the event.
    pub async fn aggregate<H: SourceHost>(
        &self,
        host: &H,
        event: &PullRequestEvent,
    ) -> Result<AggregatedRules, PerchError> {
        let global = host
            .fetch_file(&self.central_owner, &self.central_repo, &self.global_path)
            .await?
            .ok_or_else(|| {
                PerchError::GitHub(format!(
                    "mandatory global rules {}/{}/{} not found",
                    self.central_owner, self.central_repo, self.global_path
                ))
            })?;

        let filename = repo_rules_filename(&event.repo);
        let (central, local) = tokio::join!(
            optional_fetch(
                host,
                &self.central_owner,
                &self.central_repo,
                &filename,
                RuleProvenance::Central,
            ),
            optional_fetch(host, &event.owner, &event.repo, &filename, RuleProvenance::Local),
        );

        Ok(AggregatedRules {
            global,
            central,
            local,
        })
    }
}

/// Fetch an optional rule document. Never fails: not-found and transient
/// errors both collapse to absence, the latter with a warning.
async fn optional_fetch<H: SourceHost>(
    host: &H,
    owner: &str,
    repo: &str,
    path: &str,
    provenance: RuleProvenance,
) -> RuleDocument {
    match host.fetch_file(owner, repo, path).await {
        Ok(Some(text)) => {
            debug!(%provenance, "fetched repo-specific rules from {owner}/{repo}/{path}");
            RuleDocument::found(provenance, text)
        }
        Ok(None) => {
            debug!(%provenance, "no repo-specific rules at {owner}/{repo}/{path}");
            RuleDocument::absent(provenance)
        }
        Err(e) => {
            warn!(%provenance, "failed to fetch optional rules from {owner}/{repo}/{path}: {e}");
            RuleDocument::absent(provenance)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use perch_core::{CENTRAL_RULES_PLACEHOLDER, LOCAL_RULES_PLACEHOLDER};

    use super::*;

    /// In-memory source host: maps `owner/repo/path` to an outcome.
    /// Unlisted paths behave as not-found.
    struct FakeHost {
        files: HashMap<String, FakeFile>,
    }

    #[derive(Clone)]
    enum FakeFile {
        Text(&'static str),
        Error,
    }

    impl FakeHost {
        fn new(entries: &[(&str, FakeFile)]) -> Self {
            Self {
                files: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            }
        }
    }

    impl SourceHost for FakeHost {
        async fn fetch_file(
            &self,
            owner: &str,
            repo: &str,
            path: &str,
        ) -> Result<Option<String>, PerchError> {
            match self.files.get(&format!("{owner}/{repo}/{path}")) {
                Some(FakeFile::Text(text)) => Ok(Some((*text).to_string())),
                Some(FakeFile::Error) => {
                    Err(PerchError::GitHub("service unavailable".into()))
                }
                None => Ok(None),
            }
        }

        async fn fetch_diff(
            &self,
            _owner: &str,
            _repo: &str,
            _number: u64,
        ) -> Result<String, PerchError> {
            unreachable!("rules tests never fetch diffs")
        }

        async fn post_comment(
            &self,
            _owner: &str,
            _repo: &str,
            _number: u64,
            _body: &str,
        ) -> Result<(), PerchError> {
            unreachable!("rules tests never post comments")
        }
    }

    fn aggregator() -> RuleAggregator {
        RuleAggregator::new(
            &CentralConfig {
                owner: "acme".into(),
                repo: "rules-repo".into(),
            },
            &RulesConfig::default(),
        )
    }

    fn event() -> PullRequestEvent {
        PullRequestEvent {
            owner: "octocat".into(),
            repo: "widget".into(),
            number: 1,
        }
    }

    #[tokio::test]
    async fn missing_global_rules_is_fatal() {
        let host = FakeHost::new(&[]);
        let result = aggregator().aggregate(&host, &event()).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("global rules"));
    }

    #[tokio::test]
    async fn global_fetch_error_is_fatal() {
        let host = FakeHost::new(&[(
            "acme/rules-repo/.ai-reviewer-rules.md",
            FakeFile::Error,
        )]);
        let result = aggregator().aggregate(&host, &event()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn absent_optional_rules_become_placeholders() {
        let host = FakeHost::new(&[(
            "acme/rules-repo/.ai-reviewer-rules.md",
            FakeFile::Text("No secrets in code."),
        )]);
        let rules = aggregator().aggregate(&host, &event()).await.unwrap();
        assert_eq!(rules.global, "No secrets in code.");
        assert!(!rules.central.is_found());
        assert!(!rules.local.is_found());

        let text = rules.render();
        assert!(text.contains("No secrets in code."));
        assert!(text.contains(CENTRAL_RULES_PLACEHOLDER));
        assert!(text.contains(LOCAL_RULES_PLACEHOLDER));
    }

    #[tokio::test]
    async fn optional_transient_error_treated_as_absent() {
        let host = FakeHost::new(&[
            (
                "acme/rules-repo/.ai-reviewer-rules.md",
                FakeFile::Text("global"),
            ),
            ("acme/rules-repo/.widget.md", FakeFile::Error),
            ("octocat/widget/.widget.md", FakeFile::Text("local rules")),
        ]);
        let rules = aggregator().aggregate(&host, &event()).await.unwrap();
        // Central errored but the event continues; local is unaffected.
        assert!(!rules.central.is_found());
        assert_eq!(rules.local.content.as_deref(), Some("local rules"));
    }

    #[tokio::test]
    async fn both_optional_sources_found() {
        let host = FakeHost::new(&[
            (
                "acme/rules-repo/.ai-reviewer-rules.md",
                FakeFile::Text("global"),
            ),
            ("acme/rules-repo/.widget.md", FakeFile::Text("central-specific")),
            ("octocat/widget/.widget.md", FakeFile::Text("local-specific")),
        ]);
        let rules = aggregator().aggregate(&host, &event()).await.unwrap();
        let text = rules.render();
        assert!(text.contains("central-specific"));
        assert!(text.contains("local-specific"));
        assert!(!text.contains(CENTRAL_RULES_PLACEHOLDER));
        assert!(!text.contains(LOCAL_RULES_PLACEHOLDER));
    }

    #[test]
    fn filename_follows_naming_convention() {
        assert_eq!(repo_rules_filename("widget"), ".widget.md");
        assert_eq!(repo_rules_filename("my.repo"), ".my.repo.md");
    }
}
