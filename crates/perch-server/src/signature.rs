use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Verify a GitHub `X-Hub-Signature-256` header against the raw body.
///
/// The header carries `sha256=` followed by the hex HMAC-SHA256 of the
/// body under the shared webhook secret. Comparison is constant-time via
/// the `hmac` crate.
///
/// # Errors
///
/// Returns [`WebhookError::InvalidSignatureFormat`] when the header is
/// not `sha256=<hex>`, or [`WebhookError::InvalidSignature`] when the
/// digest does not match.
pub fn verify_signature(secret: &str, body: &[u8], header: &str) -> Result<(), WebhookError> {
    let hex_digest = header
        .strip_prefix("sha256=")
        .ok_or_else(|| WebhookError::InvalidSignatureFormat(header.to_string()))?;
    let expected = hex::decode(hex_digest)
        .map_err(|_| WebhookError::InvalidSignatureFormat(header.to_string()))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| WebhookError::InvalidSignature)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| WebhookError::InvalidSignature)
}
