// ABOUTME: Environment-based server configuration for ports, storage, LLM and shopping tuning
// ABOUTME: Every knob has a sensible default; parse failures are config errors, not panics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Environment-only server configuration.
//!
//! | Variable | Default | Purpose |
//! |---|---|---|
//! | `LARDER_HTTP_PORT` | `8080` | HTTP listen port |
//! | `DATABASE_URL` | `sqlite:data/larder.db?mode=rwc` | sqlite database |
//! | `LARDER_LLM_BASE_URL` | `http://localhost:11434/v1` | OpenAI-compatible endpoint |
//! | `LARDER_LLM_API_KEY` | unset | bearer token, optional for local servers |
//! | `LARDER_LLM_MODEL` | `qwen2.5:14b-instruct` | chat model |
//! | `LARDER_URGENCY_THRESHOLD_DAYS` | `5` | default shopping-list threshold |
//! | `LARDER_SUGGESTION_TIMEOUT_SECS` | `5` | per-call recommendation deadline |
//! | `LARDER_MAX_SUGGESTION_LOOKUPS` | `5` | suggestion lookups per request |

use std::env;

use larder_intelligence::DEFAULT_URGENCY_THRESHOLD_DAYS;

use crate::errors::{AppError, AppResult};

const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite:data/larder.db?mode=rwc";
const DEFAULT_LLM_BASE_URL: &str = "http://localhost:11434/v1";
const DEFAULT_LLM_MODEL: &str = "qwen2.5:14b-instruct";
const DEFAULT_SUGGESTION_TIMEOUT_SECS: u64 = 5;
const DEFAULT_MAX_SUGGESTION_LOOKUPS: usize = 5;

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// sqlite connection string
    pub database_url: String,
    /// LLM provider settings
    pub llm: LlmConfig,
    /// Shopping-list tuning
    pub shopping: ShoppingConfig,
}

/// OpenAI-compatible LLM endpoint settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    /// Optional; local servers usually run without one
    pub api_key: Option<String>,
    pub model: String,
}

/// Shopping-list composition tuning.
#[derive(Debug, Clone)]
pub struct ShoppingConfig {
    /// Default urgency threshold when a request does not supply one;
    /// shared by every entry point
    pub default_urgency_threshold_days: f64,
    /// Per-call deadline for recommendation lookups
    pub suggestion_timeout_secs: u64,
    /// Suggestion lookups per request, most urgent first
    pub max_suggestion_lookups: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            http_port: parse_env("LARDER_HTTP_PORT", DEFAULT_HTTP_PORT)?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.into()),
            llm: LlmConfig {
                base_url: env::var("LARDER_LLM_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.into()),
                api_key: env::var("LARDER_LLM_API_KEY").ok().filter(|key| !key.is_empty()),
                model: env::var("LARDER_LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.into()),
            },
            shopping: ShoppingConfig {
                default_urgency_threshold_days: parse_env(
                    "LARDER_URGENCY_THRESHOLD_DAYS",
                    DEFAULT_URGENCY_THRESHOLD_DAYS,
                )?,
                suggestion_timeout_secs: parse_env(
                    "LARDER_SUGGESTION_TIMEOUT_SECS",
                    DEFAULT_SUGGESTION_TIMEOUT_SECS,
                )?,
                max_suggestion_lookups: parse_env(
                    "LARDER_MAX_SUGGESTION_LOOKUPS",
                    DEFAULT_MAX_SUGGESTION_LOOKUPS,
                )?,
            },
        })
    }

    /// One-line summary for startup logging. The API key never appears.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} database={} llm={}@{} threshold={}d",
            self.http_port,
            self.database_url,
            self.llm.model,
            self.llm.base_url,
            self.shopping.default_urgency_threshold_days,
        )
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| {
            AppError::config(format!("invalid value for {name}: {raw:?}"))
        }),
        Err(_) => Ok(default),
    }
}
