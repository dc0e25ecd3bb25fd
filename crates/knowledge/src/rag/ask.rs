//! Tiered answering: local corpus, then restricted web, then refusal.
//!
//! The policy is an explicit state machine ([`AnswerState`]). Each
//! non-terminal state runs one lookup and moves on according to whether it
//! found grounding. Only the two answered states call the model; a refusal
//! is returned without a model call.

use crate::config::KnowledgeBaseConfig;
use crate::index::{Index, KnowledgeStore};
use crate::rag::health::{check_health, HealthReport};
use crate::rag::search;
use crate::rag::sources::{
    format_context, format_sources, format_web_search_context, format_web_sources,
};
use crate::rag::types::{AnswerResult, AnswerState};
use crate::types::{ConversationTurn, IndexStats, SearchResult, TurnRole};
use crate::web::{DomainAllowList, WebSearch, WebSearchResult};
use assist_core::{AppConfig, AppError, AppResult, ProviderFailure};
use assist_llm::{ChatMessage, LlmClient, LlmRequest};
use assist_prompt::{SystemPrompt, SystemPromptVars};
use std::sync::Arc;

/// Tunables of one assistant.
#[derive(Debug, Clone)]
pub struct AnswerPolicy {
    /// Local results fed to the model
    pub top_k: usize,

    /// Trailing conversation turns included in the prompt
    pub history_window: usize,

    /// Web results requested on fallback
    pub web_max_results: usize,

    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AnswerPolicy {
    fn default() -> Self {
        Self {
            top_k: 5,
            history_window: 6,
            web_max_results: 5,
            model: "llama3.2".to_string(),
            temperature: 0.5,
            max_tokens: 8192,
        }
    }
}

impl AnswerPolicy {
    pub fn from_config(knowledge: &KnowledgeBaseConfig, app: &AppConfig) -> Self {
        Self {
            top_k: knowledge.top_k,
            history_window: knowledge.history_window,
            web_max_results: knowledge.web.max_results,
            model: app.model.clone(),
            temperature: app.temperature,
            max_tokens: app.max_tokens,
        }
    }
}

/// Answers questions against a [`KnowledgeStore`].
pub struct Assistant {
    store: Arc<KnowledgeStore>,
    llm: Arc<dyn LlmClient>,
    web: Option<Arc<dyn WebSearch>>,
    allow_list: DomainAllowList,
    prompt: SystemPrompt,
    policy: AnswerPolicy,
}

impl Assistant {
    /// An assistant without web fallback: no local result means refusal.
    pub fn new(
        store: Arc<KnowledgeStore>,
        llm: Arc<dyn LlmClient>,
        prompt: SystemPrompt,
        policy: AnswerPolicy,
    ) -> Self {
        Self {
            store,
            llm,
            web: None,
            allow_list: DomainAllowList::default(),
            prompt,
            policy,
        }
    }

    /// Enable web fallback restricted to `allow_list`.
    #[must_use]
    pub fn with_web_search(mut self, web: Arc<dyn WebSearch>, allow_list: DomainAllowList) -> Self {
        self.web = Some(web);
        self.allow_list = allow_list;
        self
    }

    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.store
    }

    pub fn policy(&self) -> &AnswerPolicy {
        &self.policy
    }

    pub fn web_enabled(&self) -> bool {
        self.web.is_some()
    }

    /// Answer `query` given the caller's conversation `history`.
    ///
    /// # Errors
    /// `AppError::Provider` when the model call fails; the caller renders
    /// [`AppError::user_message`]. Web search failures are not errors.
    pub async fn answer_question(
        &self,
        query: &str,
        history: &[ConversationTurn],
    ) -> AppResult<AnswerResult> {
        // One snapshot per question: every source comes from one generation.
        let index = self.store.snapshot();

        let mut state = AnswerState::LocalLookup;
        let mut trail = vec![state];
        let mut local: Vec<SearchResult> = Vec::new();
        let mut web: Vec<WebSearchResult> = Vec::new();

        while !state.is_terminal() {
            let grounded = match state {
                AnswerState::LocalLookup => {
                    local = search::search(&index, query, self.store.weights(), self.policy.top_k);
                    !local.is_empty()
                }
                AnswerState::WebFallback => {
                    web = self.web_lookup(query).await;
                    !web.is_empty()
                }
                AnswerState::AnsweredLocal | AnswerState::AnsweredWeb | AnswerState::Refused => {
                    break
                }
            };

            let next = state.next(grounded);
            tracing::debug!("Answer policy: {:?} -> {:?}", state, next);
            state = next;
            trail.push(state);
        }

        tracing::info!(
            "Answer policy finished in {:?} ({} local, {} web results)",
            state,
            local.len(),
            web.len()
        );

        let (response, sources, used_web_search) = match state {
            AnswerState::AnsweredLocal => {
                let context = format_context(&local);
                let messages = self.compose(&index, &context, None, history, query)?;
                let text = self.invoke(messages).await?;
                (text, format_sources(&local), false)
            }
            AnswerState::AnsweredWeb => {
                let context = format_context(&[]);
                let web_context = format_web_search_context(&web);
                let messages =
                    self.compose(&index, &context, Some(&web_context), history, query)?;
                let text = self.invoke(messages).await?;
                (
                    with_disclosure(&text, self.prompt.disclosure()),
                    format_web_sources(&web),
                    true,
                )
            }
            _ => (self.prompt.refusal().to_string(), Vec::new(), false),
        };

        Ok(AnswerResult {
            response,
            sources,
            used_web_search,
            state,
            trail,
            generation: index.generation(),
        })
    }

    /// Rebuild the index from the corpus off the async runtime.
    ///
    /// # Errors
    /// `AppError::CorpusLoad` when nothing could be loaded; the previous
    /// index stays in place.
    pub async fn reload_corpus(&self) -> AppResult<IndexStats> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.reload())
            .await
            .map_err(|e| AppError::Other(format!("Reload task failed: {}", e)))?
    }

    /// Readiness of the index, the model provider, and web search.
    pub fn health(&self, ai_configured: bool) -> HealthReport {
        check_health(self.store.stats(), ai_configured, self.web_enabled())
    }

    /// Read-only retrieval, for inspection.
    pub fn peek_search(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        self.store.search(query, top_k)
    }

    async fn web_lookup(&self, query: &str) -> Vec<WebSearchResult> {
        let Some(web) = &self.web else {
            tracing::debug!("No web search configured");
            return Vec::new();
        };

        match web.search(query, self.policy.web_max_results).await {
            Ok(results) => self.allow_list.select(results, self.policy.web_max_results),
            Err(e) => {
                tracing::warn!("Treating web search failure as no results: {}", e);
                Vec::new()
            }
        }
    }

    fn compose(
        &self,
        index: &Index,
        context: &str,
        web_context: Option<&str>,
        history: &[ConversationTurn],
        query: &str,
    ) -> AppResult<Vec<ChatMessage>> {
        let vars = SystemPromptVars {
            documents: index.documents().iter().map(|d| d.title.clone()).collect(),
            allowed_domains: self.allow_list.domains().to_vec(),
        };
        let system = self.prompt.render(&vars)?;

        let mut messages = vec![
            ChatMessage::system(system),
            ChatMessage::system(format!(
                "Contexto relevante da base de conhecimento:\n\n{}{}",
                context,
                web_context.unwrap_or("")
            )),
        ];

        if web_context.is_some() {
            messages.push(ChatMessage::system(format!(
                "A resposta se baseia apenas nas fontes web acima. Inicie com: \"{}\"",
                self.prompt.disclosure()
            )));
        }

        let window = history.len().saturating_sub(self.policy.history_window);
        for turn in &history[window..] {
            messages.push(match turn.role {
                TurnRole::User => ChatMessage::user(turn.content.clone()),
                TurnRole::Assistant => ChatMessage::assistant(turn.content.clone()),
            });
        }

        messages.push(ChatMessage::user(query));
        Ok(messages)
    }

    async fn invoke(&self, messages: Vec<ChatMessage>) -> AppResult<String> {
        let request = LlmRequest::new(self.policy.model.clone(), messages)
            .with_temperature(self.policy.temperature)
            .with_max_tokens(self.policy.max_tokens);

        match self.llm.complete(&request).await {
            Ok(response) => Ok(response.content),
            Err(e) if e.is_provider() => {
                tracing::error!("Model call via {} failed: {}", self.llm.provider_name(), e);
                Err(e)
            }
            Err(e) => {
                tracing::error!("Model call via {} failed: {}", self.llm.provider_name(), e);
                Err(AppError::Provider(ProviderFailure::MalformedResponse))
            }
        }
    }
}

/// Prefix `text` with the disclosure sentence unless it already opens with it.
fn with_disclosure(text: &str, disclosure: &str) -> String {
    let trimmed = text.trim_start();
    if trimmed.starts_with(disclosure) {
        trimmed.to_string()
    } else {
        format!("{}\n\n{}", disclosure, trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_disclosure_prepends_once() {
        let disclosure = "Fonte externa:";
        assert_eq!(
            with_disclosure("Prazo de 30 dias.", disclosure),
            "Fonte externa:\n\nPrazo de 30 dias."
        );
        assert_eq!(
            with_disclosure("  Fonte externa: prazo de 30 dias.", disclosure),
            "Fonte externa: prazo de 30 dias."
        );
    }

    #[test]
    fn test_policy_from_config() {
        let knowledge = KnowledgeBaseConfig {
            top_k: 3,
            history_window: 2,
            ..Default::default()
        };
        let app = AppConfig {
            model: "gemini-2.5-flash".to_string(),
            ..AppConfig::default()
        };

        let policy = AnswerPolicy::from_config(&knowledge, &app);
        assert_eq!(policy.top_k, 3);
        assert_eq!(policy.history_window, 2);
        assert_eq!(policy.web_max_results, 5);
        assert_eq!(policy.model, "gemini-2.5-flash");
    }
}
