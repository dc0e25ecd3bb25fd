//! Answer types: citations, policy states, and the per-question result.

use serde::{Deserialize, Serialize};

/// Provenance of an answer's supporting text.
///
/// Local citations carry a section, web citations a link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub document_title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Citation {
    pub fn local(document_title: impl Into<String>, section: Option<String>) -> Self {
        Self {
            document_title: document_title.into(),
            section,
            link: None,
        }
    }

    pub fn web(document_title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            document_title: document_title.into(),
            section: None,
            link: Some(link.into()),
        }
    }
}

/// States of the tiered answer policy.
///
/// `LocalLookup -> {AnsweredLocal | WebFallback}`,
/// `WebFallback -> {AnsweredWeb | Refused}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerState {
    LocalLookup,
    WebFallback,
    AnsweredLocal,
    AnsweredWeb,
    Refused,
}

impl AnswerState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AnswerState::AnsweredLocal | AnswerState::AnsweredWeb | AnswerState::Refused
        )
    }

    /// The state reached once this tier knows whether it found grounding.
    /// Terminal states do not move.
    pub fn next(self, grounded: bool) -> AnswerState {
        match (self, grounded) {
            (AnswerState::LocalLookup, true) => AnswerState::AnsweredLocal,
            (AnswerState::LocalLookup, false) => AnswerState::WebFallback,
            (AnswerState::WebFallback, true) => AnswerState::AnsweredWeb,
            (AnswerState::WebFallback, false) => AnswerState::Refused,
            (terminal, _) => terminal,
        }
    }
}

/// The outcome of one question.
///
/// Serializes to `{response, sources, usedWebSearch}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub response: String,

    pub sources: Vec<Citation>,

    pub used_web_search: bool,

    /// Terminal policy state
    #[serde(skip)]
    pub state: AnswerState,

    /// Every state visited, in order
    #[serde(skip)]
    pub trail: Vec<AnswerState>,

    /// Index generation the local lookup read
    #[serde(skip)]
    pub generation: u64,
}
