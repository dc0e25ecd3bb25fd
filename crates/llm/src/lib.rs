//! Model adapter crate for the SEI assistant.
//!
//! This crate is the boundary to the language model: chat messages in,
//! plain text out. Providers that answer with multi-part content are
//! normalized before anything leaves the crate.
//!
//! # Providers
//! - **Ollama**: Local model runtime (default)
//! - **OpenAI-compatible**: Any `/chat/completions` endpoint, including Gemini
//!
//! # Example
//! ```no_run
//! use assist_llm::{ChatMessage, LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("llama3.2", vec![ChatMessage::user("Olá")]);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{
    ChatMessage, ContentPart, LlmClient, LlmRequest, LlmResponse, LlmUsage, ResponseContent, Role,
};
pub use factory::{create_client, create_from_config, create_or_unconfigured, UnconfiguredClient};
pub use providers::{OllamaClient, OpenAiCompatClient};
pub use types::ProviderType;
