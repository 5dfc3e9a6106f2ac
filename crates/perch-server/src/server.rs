use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use perch_core::{EventOutcome, PerchError};
use perch_review::github::GitHubClient;
use perch_review::llm::GeminiClient;
use perch_review::pipeline::ReviewPipeline;
use tracing::{error, info};

use crate::error::WebhookError;
use crate::payload::WebhookPayload;
use crate::signature::verify_signature;

/// The concrete pipeline wired against GitHub and Gemini.
pub type ProductionPipeline = ReviewPipeline<GitHubClient, GeminiClient>;

/// Shared state behind the webhook route.
pub struct AppState {
    /// The pipeline every accepted event is run through.
    pub pipeline: Arc<ProductionPipeline>,
    /// Shared secret for `X-Hub-Signature-256` verification.
    pub webhook_secret: String,
}

/// Build the router exposing `POST /webhook`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook", post(handle_webhook))
        .with_state(state)
}

/// Bind the listener and serve until ctrl-c.
///
/// # Errors
///
/// Returns [`PerchError::Io`] if the port cannot be bound or the server
/// fails while running.
pub async fn serve(state: Arc<AppState>, port: u16) -> Result<(), PerchError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening for webhooks on http://{addr}/webhook");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

/// Authenticate, parse, and dispatch one webhook delivery.
///
/// The signature is checked over the raw body before any parsing. Only
/// `pull_request` deliveries with action `opened` are processed; every
/// other authenticated delivery is acknowledged and dropped. Accepted
/// events run on a detached task so slow upstream calls never block the
/// delivery response, and their failures are logged with the PR
/// identifier rather than surfaced to the sender.
async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, WebhookError> {
    let signature = headers
        .get("X-Hub-Signature-256")
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::MissingSignature)?;
    verify_signature(&state.webhook_secret, &body, signature)?;

    let event_type = headers
        .get("X-GitHub-Event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if event_type != "pull_request" {
        return Ok(StatusCode::NO_CONTENT);
    }

    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;
    let Some(event) = payload.opened_event() else {
        return Ok(StatusCode::NO_CONTENT);
    };
    info!(%event, "received pull request opened event");

    let pipeline = Arc::clone(&state.pipeline);
    tokio::spawn(async move {
        match pipeline.handle(&event).await {
            Ok(outcome) => info!(%event, %outcome, "event processed"),
            Err(e) => {
                error!(%event, outcome = %EventOutcome::Failed, "failed to process event: {e}");
            }
        }
    });

    Ok(StatusCode::ACCEPTED)
}
