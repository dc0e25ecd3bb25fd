//! Crate-level tests driving [`Assistant`] end to end with in-process
//! model and web collaborators.

mod answer_policy;
mod reload;

use crate::chunker::ChunkingParams;
use crate::config::ScoringWeights;
use crate::corpus::{MemoryCorpus, TitleResolver};
use crate::index::KnowledgeStore;
use crate::rag::{AnswerPolicy, Assistant};
use crate::web::{DomainAllowList, WebSearch, WebSearchResult};
use assist_core::{AppError, AppResult, ProviderFailure};
use assist_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use assist_prompt::{default_system_prompt, SystemPrompt};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the scripted model does with each request.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Text(String),
    /// Answer with the context message, so callers can inspect what was retrieved
    EchoContext,
    Fail(ProviderFailure),
}

pub(crate) struct ScriptedLlm {
    reply: Reply,
    calls: AtomicUsize,
    last: Mutex<Option<LlmRequest>>,
}

impl ScriptedLlm {
    pub(crate) fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub(crate) fn text(text: &str) -> Arc<Self> {
        Self::new(Reply::Text(text.to_string()))
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<LlmRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request.clone());

        let content = match &self.reply {
            Reply::Text(text) => text.clone(),
            Reply::EchoContext => request
                .messages
                .get(1)
                .map(|m| m.content.clone())
                .unwrap_or_default(),
            Reply::Fail(failure) => return Err(AppError::Provider(*failure)),
        };

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

/// Web collaborator returning canned results, or failing.
pub(crate) struct CannedWeb {
    results: Option<Vec<WebSearchResult>>,
    calls: AtomicUsize,
}

impl CannedWeb {
    pub(crate) fn returning(results: Vec<WebSearchResult>) -> Arc<Self> {
        Arc::new(Self {
            results: Some(results),
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            results: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearch for CannedWeb {
    fn provider_name(&self) -> &str {
        "canned"
    }

    async fn search(&self, _query: &str, _max_results: usize) -> AppResult<Vec<WebSearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.results {
            Some(results) => Ok(results.clone()),
            None => Err(AppError::SearchUnavailable("canned search failed".to_string())),
        }
    }
}

pub(crate) fn allow_list() -> DomainAllowList {
    DomainAllowList::new(["gov.br", "planalto.gov.br"])
}

/// A loaded store over `corpus`, with `titles` mapping filenames to titles.
pub(crate) fn store_over(corpus: Arc<MemoryCorpus>, titles: &[(&str, &str)]) -> Arc<KnowledgeStore> {
    let titles: HashMap<String, String> = titles
        .iter()
        .map(|(file, title)| (file.to_string(), title.to_string()))
        .collect();

    let store = KnowledgeStore::new(
        corpus,
        ChunkingParams::new(2000, 200).unwrap(),
        TitleResolver::new(titles),
        ScoringWeights::default(),
    );
    store.reload().unwrap();
    Arc::new(store)
}

pub(crate) fn system_prompt() -> SystemPrompt {
    SystemPrompt::compile(default_system_prompt()).unwrap()
}

pub(crate) fn assistant(store: Arc<KnowledgeStore>, llm: Arc<ScriptedLlm>) -> Assistant {
    Assistant::new(store, llm, system_prompt(), AnswerPolicy::default())
}
