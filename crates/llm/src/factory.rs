//! Model provider factory.
//!
//! Builds an [`LlmClient`] from the application configuration, resolving
//! the endpoint, API key, and timeout.

use crate::client::{LlmClient, LlmRequest, LlmResponse};
use crate::providers::{openai, OllamaClient, OpenAiCompatClient};
use crate::types::ProviderType;
use assist_core::{AppConfig, AppError, AppResult, ProviderFailure};
use std::sync::Arc;
use std::time::Duration;

/// Create a model client by provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "openai", "gemini")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required by "openai")
/// * `timeout` - Per-request timeout
///
/// # Errors
/// `AppError::Config` for an unknown provider, and
/// `ProviderFailure::NotConfigured` when a required key is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout: Duration,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    match provider_type {
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            Ok(Arc::new(OllamaClient::with_timeout(base_url, timeout)?))
        }
        ProviderType::OpenAi => {
            let key = api_key
                .filter(|k| !k.trim().is_empty())
                .ok_or(AppError::Provider(ProviderFailure::NotConfigured))?;
            let base_url = endpoint.unwrap_or(openai::DEFAULT_ENDPOINT);
            Ok(Arc::new(OpenAiCompatClient::new(base_url, key, timeout)?))
        }
    }
}

/// Create the client described by `config`.
pub fn create_from_config(config: &AppConfig) -> AppResult<Arc<dyn LlmClient>> {
    let api_key = config.resolve_api_key();
    create_client(
        &config.provider,
        config.endpoint.as_deref(),
        api_key.as_deref(),
        Duration::from_secs(config.timeout_secs),
    )
}

/// Stand-in for a provider that could not be built.
///
/// Every completion fails with `ProviderFailure::NotConfigured`, so callers
/// that never reach the model (retrieval, refusals) keep working.
pub struct UnconfiguredClient {
    provider: String,
}

impl UnconfiguredClient {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for UnconfiguredClient {
    fn provider_name(&self) -> &str {
        &self.provider
    }

    async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
        Err(AppError::Provider(ProviderFailure::NotConfigured))
    }
}

/// Like [`create_from_config`], but a provider missing credentials yields an
/// [`UnconfiguredClient`] instead of an error.
///
/// # Errors
/// `AppError::Config` for an unknown provider.
pub fn create_or_unconfigured(config: &AppConfig) -> AppResult<Arc<dyn LlmClient>> {
    match create_from_config(config) {
        Err(AppError::Provider(ProviderFailure::NotConfigured)) => {
            tracing::warn!("Provider '{}' has no credentials; answers are disabled", config.provider);
            Ok(Arc::new(UnconfiguredClient::new(config.provider.clone())))
        }
        other => other,
    }
}
