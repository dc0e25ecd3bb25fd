//! Command handlers for the SEI Assist CLI.
//!
//! Every command opens the workspace the same way through [`open_session`].

pub mod ask;
pub mod chat;
pub mod corpus;
pub mod health;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use corpus::{DocumentsCommand, SearchCommand};
pub use health::HealthCommand;

use assist_core::{config::AppConfig, AppResult};
use assist_knowledge::{
    create_web_search, load_config, open_workspace_store, AnswerPolicy, Assistant,
    DomainAllowList, KnowledgeBaseConfig,
};
use assist_prompt::{load_system_prompt, SYSTEM_PROMPT_ID};
use serde::Serialize;
use std::sync::Arc;

/// An assistant wired to the workspace's corpus, model, and web search.
pub struct Session {
    pub assistant: Assistant,
    pub knowledge: KnowledgeBaseConfig,
    pub ai_configured: bool,
}

/// Load configuration and build the assistant for `config.workspace`.
pub fn open_session(config: &AppConfig) -> AppResult<Session> {
    let knowledge = load_config(&config.workspace)?;
    let store = Arc::new(open_workspace_store(&config.workspace, &knowledge)?);

    let llm = assist_llm::create_or_unconfigured(config)?;
    let prompt = load_system_prompt(&config.workspace, SYSTEM_PROMPT_ID)?;
    let policy = AnswerPolicy::from_config(&knowledge, config);

    let mut assistant = Assistant::new(store, llm, prompt, policy);
    if let Some(web) = create_web_search(&knowledge.web)? {
        tracing::debug!("Web fallback via {}", web.provider_name());
        let allow_list = DomainAllowList::new(&knowledge.web.allowed_domains);
        assistant = assistant.with_web_search(web, allow_list);
    }

    Ok(Session {
        assistant,
        knowledge,
        ai_configured: config.provider_configured(),
    })
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
