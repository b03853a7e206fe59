// ABOUTME: Product recommendation agent - related-item suggestions from the LLM provider
// ABOUTME: Comma-separated parse, capped at three, per-call timeout, failure means empty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! The recommendation capability.
//!
//! Wraps the LLM provider behind the intelligence crate's [`Recommender`]
//! trait: given an item name, return up to three related item names. The
//! handle is constructed once at startup and injected wherever suggestions
//! are needed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use larder_intelligence::{CapabilityError, Recommender};
use tracing::debug;

use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// At most this many suggestions survive per item.
const MAX_SUGGESTIONS: usize = 3;

const SYSTEM_PROMPT: &str = "You are an AI assistant that suggests similar products based on \
grocery items. When given an item name, suggest 2-3 related products that are commonly \
purchased together. Keep suggestions concise and relevant to the original item. Return only \
the names of the suggested products, separated by commas.";

/// LLM-backed implementation of the recommendation capability.
pub struct ProductRecommender {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl ProductRecommender {
    /// Create a recommender over `provider` with a per-call deadline.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }
}

#[async_trait]
impl Recommender for ProductRecommender {
    async fn suggest_similar(&self, item_name: &str) -> Result<Vec<String>, CapabilityError> {
        let prompt = format!(
            "Suggest 2-3 similar products or complementary items for {item_name} that people \
             often buy together. Only list the item names, separated by commas."
        );
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ]);

        let response = tokio::time::timeout(self.timeout, self.provider.complete(&request))
            .await
            .map_err(|_| CapabilityError::TimedOut {
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|err| CapabilityError::Unavailable(err.to_string()))?;

        let suggestions = parse_suggestions(&response.content);
        debug!(item = %item_name, count = suggestions.len(), "parsed product suggestions");
        Ok(suggestions)
    }
}

/// Split a comma-separated model answer into clean item names, capped at
/// [`MAX_SUGGESTIONS`]. An empty or whitespace-only answer yields nothing.
fn parse_suggestions(content: &str) -> Vec<String> {
    content
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .take(MAX_SUGGESTIONS)
        .collect()
}
