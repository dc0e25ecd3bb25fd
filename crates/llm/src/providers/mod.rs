//! Model provider implementations.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiCompatClient;

use assist_core::{AppError, AppResult, ProviderFailure};
use std::time::Duration;

/// Map a transport error to a typed failure, logging the raw detail.
pub(crate) fn classify_transport(provider: &str, err: &reqwest::Error) -> ProviderFailure {
    tracing::warn!("{} request failed: {}", provider, err);

    if err.is_timeout() {
        ProviderFailure::Timeout
    } else if err.is_decode() {
        ProviderFailure::MalformedResponse
    } else {
        ProviderFailure::Unreachable
    }
}

/// Turn a non-success response into a typed failure, logging the body.
pub(crate) async fn rejected(provider: &str, response: reqwest::Response) -> AppError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    tracing::warn!("{} API error ({}): {}", provider, status, body);

    AppError::Provider(ProviderFailure::Rejected {
        status: status.as_u16(),
    })
}

pub(crate) fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}
