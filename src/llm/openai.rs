// ABOUTME: OpenAI-compatible chat-completion provider
// ABOUTME: Calls the /chat/completions endpoint over reqwest
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # `OpenAI`-Compatible Provider
//!
//! Works against api.openai.com or any endpoint speaking the same chat
//! completions protocol. Upstream error bodies are logged server-side and
//! never echoed to clients.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{ChatRequest, ChatResponse, LlmProvider};
use crate::config::LlmConfig;
use crate::errors::{AppError, AppResult};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const PROVIDER_NAME: &str = "openai";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [super::ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat provider backed by an `OpenAI`-compatible HTTP API
pub struct OpenAiProvider {
    client: Client,
    config: LlmConfig,
}

impl OpenAiProvider {
    /// Create a provider from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(config: LlmConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(AppError::external_service(
                PROVIDER_NAME,
                "no API key configured",
            ));
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let body = CompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(model = %self.config.model, "sending chat completion request");
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "chat completion request failed");
                AppError::external_service(PROVIDER_NAME, "request failed")
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(status = %status, detail = %detail, "chat completion returned an error");
            return Err(AppError::external_service(
                PROVIDER_NAME,
                format!("upstream returned {status}"),
            ));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            error!(error = %e, "chat completion response was not valid JSON");
            AppError::external_service(PROVIDER_NAME, "invalid response")
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::external_service(PROVIDER_NAME, "empty response"))?;

        Ok(ChatResponse { content })
    }
}
