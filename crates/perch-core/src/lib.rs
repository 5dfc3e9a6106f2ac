//! Core types, configuration, and error handling for the Perch service.
//!
//! This crate provides the shared foundation used by the other Perch
//! crates:
//! - [`PerchError`] — unified error type using `thiserror`
//! - [`PerchConfig`] — configuration loaded from `perch.toml` plus
//!   environment-injected secrets
//! - Shared types: [`PullRequestEvent`], [`RuleDocument`],
//!   [`AggregatedRules`], [`EventOutcome`]

mod config;
mod error;
mod types;

pub use config::{
    CentralConfig, GitHubConfig, LlmConfig, PerchConfig, RulesConfig, ServerConfig,
};
pub use error::PerchError;
pub use types::{
    AggregatedRules, EventOutcome, PullRequestEvent, RuleDocument, RuleProvenance,
    CENTRAL_RULES_PLACEHOLDER, LOCAL_RULES_PLACEHOLDER,
};

/// A convenience `Result` type for Perch operations.
pub type Result<T> = std::result::Result<T, PerchError>;
