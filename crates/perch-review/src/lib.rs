//! Review pipeline for the Perch service.
//!
//! One linear pass per pull-request event: rule aggregation, diff fetch,
//! prompt construction, model call, publish decision.
//! - [`github`] — `SourceHost` seam and the GitHub implementation
//! - [`rules`] — layered rule aggregation with failure-as-absence
//! - [`llm`] — `ReviewModel` seam and the Gemini client
//! - [`prompt`] — review prompt assembly and the `LGTM!` sentinel
//! - [`pipeline`] — orchestration and the publish decision

pub mod github;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod rules;
