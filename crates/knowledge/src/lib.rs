//! Knowledge base for the assistant.
//!
//! Loads a directory of plain-text documents, chunks them into an
//! in-memory index that can be reloaded atomically, ranks chunks with a
//! lexical scorer, and answers questions through a tiered policy: local
//! corpus first, then a domain-restricted web search, then refusal.

pub mod chunker;
pub mod config;
pub mod corpus;
pub mod index;
pub mod rag;
pub mod types;
pub mod web;

#[cfg(test)]
mod tests;

pub use chunker::{chunk_text, ChunkingParams};
pub use config::{
    get_config_path, load_config, KnowledgeBaseConfig, ScoringWeights, WebProvider,
    WebSearchConfig,
};
pub use corpus::{
    load_documents, CorpusSource, DirectoryCorpus, LoadedCorpus, MemoryCorpus, TitleResolver,
};
pub use index::{Index, KnowledgeStore};
pub use rag::{
    check_health, AnswerPolicy, AnswerResult, AnswerState, Assistant, Citation, HealthReport,
    HealthStatus,
};
pub use types::{
    Chunk, ConversationTurn, Document, DocumentInfo, IndexStats, SearchResult, TurnRole,
};
pub use web::{create_web_search, DomainAllowList, WebSearch, WebSearchResult};

use assist_core::AppResult;
use std::path::Path;
use std::sync::Arc;

/// Open the store for `workspace`'s corpus directory as configured.
///
/// # Errors
/// `AppError::Config` for unusable chunking settings. A corpus that fails
/// to load is logged and leaves the store empty.
pub fn open_workspace_store(
    workspace: &Path,
    config: &KnowledgeBaseConfig,
) -> AppResult<KnowledgeStore> {
    let dir = config.corpus_path(workspace);
    tracing::info!("Opening knowledge base at {}", dir.display());

    let source = DirectoryCorpus::new(dir, config.extensions.clone());
    KnowledgeStore::open(Arc::new(source), config)
}
