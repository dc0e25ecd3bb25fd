//! Knowledge system type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named source text, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name used for title lookup (e.g., "cartilha_sei_content.txt")
    pub filename: String,

    /// Human-readable title
    pub title: String,

    /// Full text
    pub text: String,
}

/// A contiguous segment of a document, the atomic retrieval unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content
    pub content: String,

    /// Title of the parent document
    pub source: String,

    /// Ordinal label within the document (e.g., "Parte 3")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// File name of the parent document
    pub filename: String,

    /// Zero-based position within the parent document
    pub ordinal: usize,
}

/// A chunk scored against one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: u32,
}

impl SearchResult {
    /// Content truncated to `max_chars` characters, with an ellipsis when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        let content = &self.chunk.content;
        match content.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &content[..cut]),
            None => content.clone(),
        }
    }
}

/// Per-document summary of the current index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub filename: String,
    pub title: String,
    pub chunk_count: usize,
}

/// Statistics for one index generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Reload generation, zero before the first load
    pub generation: u64,

    /// Documents indexed
    pub documents: usize,

    /// Chunks indexed
    pub chunks: usize,

    /// Documents skipped because they could not be read
    pub skipped: usize,

    /// When this generation was published
    pub loaded_at: DateTime<Utc>,
}

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// A prior message of the session, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}
