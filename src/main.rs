use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use perch_core::PerchConfig;
use perch_review::github::GitHubClient;
use perch_review::llm::GeminiClient;
use perch_review::pipeline::ReviewPipeline;
use perch_review::rules::RuleAggregator;
use perch_server::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "perch",
    version,
    about = "Rule-driven AI pull request reviewer",
    long_about = "Perch listens for pull_request.opened webhooks, layers global and \
                  repo-specific review rules, sends the rules plus the PR diff to a \
                  generative model, and posts the model's feedback as a PR comment.\n\n\
                  Secrets come from the environment: GITHUB_TOKEN, GEMINI_API_KEY,\n\
                  PERCH_WEBHOOK_SECRET. Everything else lives in perch.toml."
)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "perch.toml")]
    config: PathBuf,

    /// Override the listen port from the config file
    #[arg(long)]
    port: Option<u16>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();
    let cli = Cli::parse();
    init_logging();

    let mut config = if cli.config.exists() {
        PerchConfig::from_file(&cli.config).into_diagnostic()?
    } else {
        PerchConfig::default()
    };
    config.apply_env();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate().into_diagnostic()?;

    let host = GitHubClient::new(config.github.token.as_deref()).into_diagnostic()?;
    let model = GeminiClient::new(&config.llm).into_diagnostic()?;
    let aggregator = RuleAggregator::new(&config.central, &config.rules);
    let pipeline = Arc::new(ReviewPipeline::new(host, model, aggregator));

    // validate() already guaranteed the secret is present.
    let webhook_secret = config.server.webhook_secret.clone().unwrap_or_default();
    let state = Arc::new(AppState {
        pipeline,
        webhook_secret,
    });

    info!(
        model = %config.llm.model,
        central_owner = %config.central.owner,
        central_repo = %config.central.repo,
        "perch starting"
    );
    perch_server::serve(state, config.server.port)
        .await
        .into_diagnostic()?;
    Ok(())
}
