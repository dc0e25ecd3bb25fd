//! OpenAI-compatible chat completions provider.
//!
//! Works against any endpoint that speaks the `/chat/completions` dialect,
//! including the Gemini compatibility API. Message content in the response
//! may be a string or an array of parts; it is normalized to text here.

use super::{build_http_client, classify_transport, rejected};
use crate::client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage, ResponseContent};
use assist_core::{AppError, AppResult, ProviderFailure};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<LlmUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<ResponseContent>,
}

/// Client for OpenAI-compatible chat endpoints.
pub struct OpenAiCompatClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: build_http_client(timeout)?,
        })
    }

    fn convert_response(response: CompletionResponse) -> AppResult<LlmResponse> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(ResponseContent::into_text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(AppError::Provider(ProviderFailure::EmptyResponse))?;

        Ok(LlmResponse {
            content,
            model: response.model,
            usage: response.usage.unwrap_or_default(),
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiCompatClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(
            "Sending chat request to OpenAI-compatible endpoint ({} messages)",
            request.messages.len()
        );

        let body = CompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Provider(classify_transport("OpenAI-compatible", &e)))?;

        if !response.status().is_success() {
            return Err(rejected("OpenAI-compatible", response).await);
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(classify_transport("OpenAI-compatible", &e)))?;

        Self::convert_response(parsed)
    }
}
