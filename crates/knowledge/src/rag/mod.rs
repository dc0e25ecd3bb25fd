//! RAG (Retrieval-Augmented Generation) answering system.
//!
//! Lexical retrieval, context assembly, and the tiered answer policy.

pub mod ask;
pub mod health;
pub mod search;
pub mod sources;
pub mod types;

pub use ask::{AnswerPolicy, Assistant};
pub use health::{check_health, HealthReport, HealthStatus};
pub use sources::{
    format_context, format_sources, format_web_search_context, format_web_sources,
    NO_CONTEXT_FOUND,
};
pub use types::{AnswerResult, AnswerState, Citation};
