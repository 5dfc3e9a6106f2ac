use perch_core::PullRequestEvent;
use serde::Deserialize;

/// The slice of a GitHub webhook payload the service cares about.
///
/// Everything is optional at the serde level so unrelated event shapes
/// still parse; [`opened_event`](Self::opened_event) decides whether the
/// delivery is one we process.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub action: Option<String>,
    pub pull_request: Option<PullRequestInfo>,
    pub repository: Option<RepositoryInfo>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestInfo {
    pub number: u64,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub owner: OwnerInfo,
}

#[derive(Debug, Deserialize)]
pub struct OwnerInfo {
    pub login: String,
}

impl WebhookPayload {
    /// Extract the event coordinates when this is a `pull_request` payload
    /// with action `opened`; `None` for everything else.
    pub fn opened_event(&self) -> Option<PullRequestEvent> {
        if self.action.as_deref() != Some("opened") {
            return None;
        }
        let pr = self.pull_request.as_ref()?;
        let repo = self.repository.as_ref()?;
        Some(PullRequestEvent {
            owner: repo.owner.login.clone(),
            repo: repo.name.clone(),
            number: pr.number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPENED: &str = r#"{
        "action": "opened",
        "pull_request": { "number": 42, "title": "Add feature" },
        "repository": {
            "name": "widget",
            "owner": { "login": "octocat", "id": 1 },
            "private": false
        },
        "sender": { "login": "someone" }
    }"#;

    #[test]
    fn opened_payload_yields_event() {
        let payload: WebhookPayload = serde_json::from_str(OPENED).unwrap();
        let event = payload.opened_event().unwrap();
        assert_eq!(event.owner, "octocat");
        assert_eq!(event.repo, "widget");
        assert_eq!(event.number, 42);
    }

    #[test]
    fn non_opened_action_is_ignored() {
        let payload: WebhookPayload =
            serde_json::from_str(&OPENED.replace("\"opened\"", "\"closed\"")).unwrap();
        assert!(payload.opened_event().is_none());
    }

    #[test]
    fn payload_without_pull_request_is_ignored() {
        let payload: WebhookPayload =
            serde_json::from_str(r#"{"action":"opened","repository":null}"#).unwrap();
        assert!(payload.opened_event().is_none());
    }

    #[test]
    fn unrelated_event_shape_still_parses() {
        let payload: WebhookPayload =
            serde_json::from_str(r#"{"zen":"Design for failure.","hook_id":1}"#).unwrap();
        assert!(payload.opened_event().is_none());
    }
}
