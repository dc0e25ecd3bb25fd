//! Prompt system for the SEI assistant.
//!
//! This crate provides the assistant's system instructions:
//! - YAML-based prompt definitions with a built-in default
//! - Handlebars rendering of the corpus document list and domain allow-list
//! - The disclosure and refusal sentences the answer policy relies on

pub mod builder;
pub mod defaults;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{render_system_prompt, SystemPrompt};
pub use defaults::{default_system_prompt, SYSTEM_PROMPT_ID};
pub use loader::{list_prompts, load_prompt, load_system_prompt};
pub use types::{PromptDefinition, SystemPromptVars, DEFAULT_DISCLOSURE, DEFAULT_REFUSAL};
