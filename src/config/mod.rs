// ABOUTME: Configuration module wiring for the Larder server
// ABOUTME: Environment-only configuration, no config files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Server configuration. Everything comes from environment variables.

pub mod environment;

pub use environment::{LlmConfig, ServerConfig, ShoppingConfig};
