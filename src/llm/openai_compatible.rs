// ABOUTME: Generic OpenAI-compatible LLM provider for local and cloud endpoints
// ABOUTME: Works against Ollama, vLLM, LocalAI and any chat/completions API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # OpenAI-Compatible Provider
//!
//! Generic implementation for any OpenAI-compatible chat endpoint. Local
//! servers (Ollama at `http://localhost:11434/v1`, vLLM, LocalAI) work
//! without an API key; cloud endpoints take a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider};
use crate::config::LlmConfig;
use crate::errors::AppError;

/// Connection timeout; local servers can be slow to wake.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Overall request timeout; local inference can take a while.
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// Wire types (OpenAI chat/completions format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    model: Option<String>,
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

// ============================================================================
// Provider
// ============================================================================

/// Provider for any OpenAI-compatible chat endpoint.
pub struct OpenAiCompatibleProvider {
    config: LlmConfig,
    client: Client,
}

impl OpenAiCompatibleProvider {
    /// Build a provider from configuration.
    pub fn new(config: LlmConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|err| AppError::config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { config, client })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn convert_messages(messages: &[ChatMessage]) -> Vec<OpenAiMessage> {
        messages
            .iter()
            .map(|message| OpenAiMessage {
                role: message.role.as_str(),
                content: message.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let payload = OpenAiRequest {
            model: model.to_owned(),
            messages: Self::convert_messages(&request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let mut http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&payload);
        if let Some(api_key) = &self.config.api_key {
            http_request = http_request.bearer_auth(api_key);
        }

        let response = http_request.send().await.map_err(|err| {
            error!("failed to reach LLM endpoint: {err}");
            if err.is_connect() {
                AppError::external_service(
                    "llm",
                    format!("cannot connect to {}; is the server running?", self.config.base_url),
                )
            } else {
                AppError::external_service("llm", err.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AppError::external_service("llm", format!("failed to read response: {err}")))?;
        if !status.is_success() {
            return Err(AppError::external_service(
                "llm",
                format!("endpoint returned {status}: {body}"),
            ));
        }

        let parsed: OpenAiResponse = serde_json::from_str(&body).map_err(|err| {
            error!("failed to parse LLM response: {err}");
            AppError::external_service("llm", format!("failed to parse response: {err}"))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service("llm", "API returned no choices"))?;
        let content = choice.message.content.unwrap_or_default();

        debug!(
            chars = content.len(),
            finish_reason = ?choice.finish_reason,
            "received LLM completion"
        );

        Ok(ChatResponse {
            content,
            model: parsed.model.unwrap_or_else(|| model.to_owned()),
            finish_reason: choice.finish_reason,
        })
    }
}
