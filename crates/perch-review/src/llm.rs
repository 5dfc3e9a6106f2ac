use std::time::Duration;

use perch_core::{LlmConfig, PerchError};
use serde::Deserialize;

/// Seam over the generative-language API.
///
/// One operation: prompt text in, free-text review out. Network,
/// authentication, and model-side content failures all surface as a
/// single review-generation error; nothing is retried.
pub trait ReviewModel {
    /// Generate review text for the given prompt.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, PerchError>> + Send;
}

/// Gemini `generateContent` client.
///
/// Talks to the Google generative-language REST API with a fixed model
/// identifier and no sampling parameters.
///
/// # Examples
///
/// ```
/// use perch_core::LlmConfig;
/// use perch_review::llm::GeminiClient;
///
/// let config = LlmConfig {
///     api_key: Some("test-key".into()),
///     ..LlmConfig::default()
/// };
/// let client = GeminiClient::new(&config).unwrap();
/// assert_eq!(client.model(), "gemini-1.5-flash-latest");
/// ```
pub struct GeminiClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl GeminiClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PerchError::Llm`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, PerchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| PerchError::Llm(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Return the model name from the configuration.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl ReviewModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, PerchError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| PerchError::Llm("Gemini API key not configured".into()))?;
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://generativelanguage.googleapis.com");
        let url = format!(
            "{base_url}/v1beta/models/{}:generateContent?key={api_key}",
            self.config.model
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| PerchError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(PerchError::Llm(format!(
                "Gemini API error {status}: {body_text}"
            )));
        }

        let response_body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PerchError::Llm(format!("failed to parse response: {e}")))?;

        Ok(extract_text(&response_body))
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenate the text parts of the first candidate, like the API's own
/// `response.text()` helper does. A response with no candidate text yields
/// an empty string, which the publish decision treats as "no actionable
/// feedback" rather than a failure.
fn extract_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default()
}
