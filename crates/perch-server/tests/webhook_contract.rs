//! HTTP contract of the webhook route.
//!
//! Drives the router directly with `tower::ServiceExt::oneshot`: every
//! authenticated delivery is acknowledged with a 2xx, only
//! `pull_request` / action `opened` is dispatched (202), everything else
//! is dropped (204), and authentication failures map to 401.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use perch_core::{CentralConfig, LlmConfig, RulesConfig};
use perch_review::github::GitHubClient;
use perch_review::llm::GeminiClient;
use perch_review::pipeline::ReviewPipeline;
use perch_review::rules::RuleAggregator;
use perch_server::{router, AppState};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

const OPENED: &str = r#"{"action":"opened","pull_request":{"number":7},"repository":{"name":"widget","owner":{"login":"octocat"}}}"#;
const CLOSED: &str = r#"{"action":"closed","pull_request":{"number":7},"repository":{"name":"widget","owner":{"login":"octocat"}}}"#;

// hmac_sha256("test-secret", body) for the payloads above.
const OPENED_SIG: &str =
    "sha256=10424f7724e4cd14de4eaaa4f065faccc2b3bc35d47777f1d9b13c2d1ea3ae0e";
const CLOSED_SIG: &str =
    "sha256=cdcba38433a21f8410752186ab7d8c3eab74edeaf49593a48c9a064d314ce58c";

/// Router wired against unreachable credentials. The contract tests only
/// observe acknowledgment codes; any dispatched pipeline run fails in the
/// background against the dead endpoints, which is log-only by design.
fn test_router() -> axum::Router {
    let host = GitHubClient::new(Some("ghp_test")).unwrap();
    let model = GeminiClient::new(&LlmConfig {
        api_key: Some("test-key".into()),
        base_url: Some("http://127.0.0.1:1".into()),
        ..LlmConfig::default()
    })
    .unwrap();
    let aggregator = RuleAggregator::new(
        &CentralConfig {
            owner: "acme".into(),
            repo: "rules-repo".into(),
        },
        &RulesConfig::default(),
    );
    let state = Arc::new(AppState {
        pipeline: Arc::new(ReviewPipeline::new(host, model, aggregator)),
        webhook_secret: SECRET.into(),
    });
    router(state)
}

fn delivery(event: &str, signature: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("X-GitHub-Event", event)
        .header("Content-Type", "application/json");
    if let Some(sig) = signature {
        builder = builder.header("X-Hub-Signature-256", sig);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn opened_pull_request_is_accepted() {
    let response = test_router()
        .oneshot(delivery("pull_request", Some(OPENED_SIG), OPENED))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn non_pull_request_event_is_acknowledged_and_dropped() {
    // Same authenticated body, different event header: 2xx, not dispatched.
    let response = test_router()
        .oneshot(delivery("ping", Some(OPENED_SIG), OPENED))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn non_opened_action_is_acknowledged_and_dropped() {
    let response = test_router()
        .oneshot(delivery("pull_request", Some(CLOSED_SIG), CLOSED))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn bad_signature_is_unauthorized() {
    let response = test_router()
        .oneshot(delivery("pull_request", Some(CLOSED_SIG), OPENED))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_signature_is_unauthorized() {
    let response = test_router()
        .oneshot(delivery("pull_request", None, OPENED))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_authenticated_payload_is_bad_request() {
    // Valid signature over a body that is not a webhook payload shape.
    let body = "not json";
    // hmac_sha256("test-secret", "not json")
    let sig = "sha256=fe68c90da0bbb712f0f5c50663c6a30698f249678fb190ddd85d95dfe208faa6";
    let response = test_router()
        .oneshot(delivery("pull_request", Some(sig), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
