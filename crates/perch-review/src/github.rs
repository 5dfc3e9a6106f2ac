use perch_core::PerchError;

/// Seam over the source-control hosting API.
///
/// The review pipeline and rule aggregator only talk to this trait, so
/// tests can inject fakes without any network access. The three
/// operations mirror what one event handling pass needs: read a file,
/// read a diff, write a comment.
pub trait SourceHost {
    /// Fetch a repository file's decoded text content.
    ///
    /// Returns `Ok(None)` when the file does not exist; any other failure
    /// is an error. Callers decide whether absence is fatal.
    fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, PerchError>> + Send;

    /// Fetch the unified diff for a pull request.
    fn fetch_diff(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> impl std::future::Future<Output = Result<String, PerchError>> + Send;

    /// Post a comment on a pull request (via its issue number).
    fn post_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> impl std::future::Future<Output = Result<(), PerchError>> + Send;
}

/// GitHub client for fetching rule files and diffs and posting comments.
///
/// Content and comment operations go through `octocrab`; the raw diff is
/// fetched directly over HTTP with the `application/vnd.github.v3.diff`
/// media type, which octocrab does not expose.
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
    http: reqwest::Client,
    token: String,
}

impl GitHubClient {
    /// Create a client from an explicit token or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`PerchError::Config`] if no token is available, or
    /// [`PerchError::GitHub`] if the client cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use perch_review::github::GitHubClient;
    ///
    /// let client = GitHubClient::new(Some("ghp_xxxx")).unwrap();
    /// ```
    pub fn new(token: Option<&str>) -> Result<Self, PerchError> {
        let token = match token {
            Some(t) => t.to_string(),
            None => std::env::var("GITHUB_TOKEN").map_err(|_| {
                PerchError::Config(
                    "GITHUB_TOKEN not set. Set github.token or the GITHUB_TOKEN env var".into(),
                )
            })?,
        };

        let octocrab = octocrab::Octocrab::builder()
            .personal_token(token.clone())
            .build()
            .map_err(|e| PerchError::GitHub(format!("failed to create GitHub client: {e}")))?;

        let http = reqwest::Client::new();

        Ok(Self {
            octocrab,
            http,
            token,
        })
    }
}

impl SourceHost for GitHubClient {
    async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<String>, PerchError> {
        let result = self
            .octocrab
            .repos(owner, repo)
            .get_content()
            .path(path)
            .send()
            .await;

        let content = match result {
            Ok(c) => c,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => {
                return Err(PerchError::GitHub(format!(
                    "failed to fetch {owner}/{repo}/{path}: {e}"
                )))
            }
        };

        let item = content.items.into_iter().next().ok_or_else(|| {
            PerchError::GitHub(format!("{owner}/{repo}/{path} returned no content items"))
        })?;
        let text = item.decoded_content().ok_or_else(|| {
            PerchError::GitHub(format!("{owner}/{repo}/{path} has no decodable content"))
        })?;
        Ok(Some(text))
    }

    async fn fetch_diff(&self, owner: &str, repo: &str, number: u64) -> Result<String, PerchError> {
        let url = format!("https://api.github.com/repos/{owner}/{repo}/pulls/{number}");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github.v3.diff")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "perch")
            .send()
            .await
            .map_err(|e| PerchError::GitHub(format!("failed to fetch PR diff: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PerchError::GitHub(format!(
                "GitHub API error {status}: {body}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| PerchError::GitHub(format!("failed to read diff response: {e}")))
    }

    async fn post_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), PerchError> {
        self.octocrab
            .issues(owner, repo)
            .create_comment(number, body)
            .await
            .map_err(|e| PerchError::GitHub(format!("failed to post comment: {e}")))?;
        Ok(())
    }
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}
