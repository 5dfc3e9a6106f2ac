use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PerchError;

/// Top-level configuration loaded from `perch.toml`.
///
/// Secrets (API tokens, webhook secret) are layered on top from the
/// environment via [`PerchConfig::apply_env`]; nothing inside the review
/// pipeline reads ambient process state.
///
/// # Examples
///
/// ```
/// use perch_core::PerchConfig;
///
/// let config = PerchConfig::default();
/// assert_eq!(config.rules.global_path, ".ai-reviewer-rules.md");
/// assert_eq!(config.server.port, 3000);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerchConfig {
    /// Coordinate of the central rules repository.
    #[serde(default)]
    pub central: CentralConfig,
    /// Rule document locations.
    #[serde(default)]
    pub rules: RulesConfig,
    /// Source-control API settings.
    #[serde(default)]
    pub github: GitHubConfig,
    /// Generative-language model settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Webhook server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

impl PerchConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PerchError::Io`] if the file cannot be read, or
    /// [`PerchError::Toml`] if the content is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, PerchError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`PerchError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use perch_core::PerchConfig;
    ///
    /// let toml = r#"
    /// [central]
    /// owner = "acme"
    /// repo = "review-rules"
    /// "#;
    /// let config = PerchConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.central.owner, "acme");
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, PerchError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Layer secrets from the process environment over the file values.
    ///
    /// Reads `GITHUB_TOKEN`, `GEMINI_API_KEY`, and `PERCH_WEBHOOK_SECRET`.
    /// File values are kept when the variable is unset.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Same as [`apply_env`](Self::apply_env) with an injected lookup,
    /// so tests never mutate the real environment.
    pub fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(token) = get("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(secret) = get("PERCH_WEBHOOK_SECRET") {
            self.server.webhook_secret = Some(secret);
        }
    }

    /// Check that everything the service cannot run without is present.
    ///
    /// # Errors
    ///
    /// Returns [`PerchError::Config`] naming the first missing value.
    pub fn validate(&self) -> Result<(), PerchError> {
        if self.central.owner.is_empty() {
            return Err(PerchError::Config(
                "central.owner is required (the central rules repository)".into(),
            ));
        }
        if self.central.repo.is_empty() {
            return Err(PerchError::Config("central.repo is required".into()));
        }
        if self.github.token.is_none() {
            return Err(PerchError::Config(
                "GitHub token missing. Set GITHUB_TOKEN or github.token".into(),
            ));
        }
        if self.llm.api_key.is_none() {
            return Err(PerchError::Config(
                "Gemini API key missing. Set GEMINI_API_KEY or llm.api_key".into(),
            ));
        }
        if self.server.webhook_secret.is_none() {
            return Err(PerchError::Config(
                "webhook secret missing. Set PERCH_WEBHOOK_SECRET or server.webhook_secret".into(),
            ));
        }
        Ok(())
    }
}

/// Coordinate of the shared central rules repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentralConfig {
    /// Owner login of the central repository.
    #[serde(default)]
    pub owner: String,
    /// Name of the central repository.
    #[serde(default = "default_central_repo")]
    pub repo: String,
}

fn default_central_repo() -> String {
    "ai-reviewer-config".into()
}

impl Default for CentralConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: default_central_repo(),
        }
    }
}

/// Rule document locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Path of the mandatory global rules file inside the central repo.
    #[serde(default = "default_global_path")]
    pub global_path: String,
}

fn default_global_path() -> String {
    ".ai-reviewer-rules.md".into()
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            global_path: default_global_path(),
        }
    }
}

/// Source-control API settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Personal access or installation token. Usually injected via
    /// `GITHUB_TOKEN` rather than written to the config file.
    pub token: Option<String>,
}

/// Generative-language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier (default: `gemini-1.5-flash-latest`).
    #[serde(default = "default_model")]
    pub model: String,
    /// API key. Usually injected via `GEMINI_API_KEY`.
    pub api_key: Option<String>,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
}

fn default_model() -> String {
    "gemini-1.5-flash-latest".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Webhook server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// TCP port to listen on (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret used to verify `X-Hub-Signature-256`. Usually
    /// injected via `PERCH_WEBHOOK_SECRET`.
    pub webhook_secret: Option<String>,
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            webhook_secret: None,
        }
    }
}
