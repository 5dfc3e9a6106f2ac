//! Webhook surface for the Perch service.
//!
//! Receives GitHub webhook deliveries, verifies the HMAC signature over
//! the raw body, filters for `pull_request.opened`, and hands accepted
//! events to the review pipeline. Everything past authentication is
//! fire-and-forget from the sender's point of view: processing failures
//! are operator-log-only.

mod error;
mod payload;
mod server;
mod signature;

pub use error::WebhookError;
pub use payload::WebhookPayload;
pub use server::{router, serve, AppState, ProductionPipeline};
pub use signature::verify_signature;
