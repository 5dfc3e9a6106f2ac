use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors raised while authenticating and parsing a webhook delivery.
///
/// These map to the HTTP status codes the GitHub webhook protocol
/// expects. Pipeline failures never appear here: once a delivery is
/// authenticated and parsed it is acknowledged, and processing errors are
/// visible only in operator logs.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The `X-Hub-Signature-256` header is missing.
    #[error("missing signature header")]
    MissingSignature,

    /// The signature header has an invalid format.
    #[error("invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    /// HMAC verification failed.
    #[error("invalid signature")]
    InvalidSignature,

    /// The request payload could not be parsed.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl WebhookError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::InvalidSignatureFormat(_)
            | WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
