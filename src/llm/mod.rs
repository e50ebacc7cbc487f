// ABOUTME: Chat-completion provider abstraction for AI-assisted answers
// ABOUTME: Shared message/request types and the provider trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Chat-Completion Providers
//!
//! The question-answering endpoint delegates to an external chat-completion
//! API behind the [`LlmProvider`] trait, so tests can substitute a stub and
//! the upstream vendor can change without touching the handlers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

/// `OpenAI`-compatible chat provider over HTTP
pub mod openai;

pub use openai::OpenAiProvider;

/// A single message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// A chat completion request
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Conversation messages in order
    pub messages: Vec<ChatMessage>,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl ChatRequest {
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            messages,
            max_tokens,
            temperature,
        }
    }
}

/// A chat completion response
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Generated text
    pub content: String,
}

/// Chat-completion provider contract
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a chat request
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse>;
}
