/// Errors that can occur across the Perch service.
///
/// Each variant wraps a specific failure domain. Library crates use this
/// type directly; the binary crate converts to `miette` diagnostics at the
/// boundary.
///
/// # Examples
///
/// ```
/// use perch_core::PerchError;
///
/// let err = PerchError::Config("missing central.owner".into());
/// assert!(err.to_string().contains("missing central.owner"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum PerchError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Source-control API failure (content, diff, or comment endpoints).
    #[error("GitHub error: {0}")]
    GitHub(String),

    /// Generative-language API or response error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Webhook delivery failure (bad signature, malformed payload).
    #[error("webhook error: {0}")]
    Webhook(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
