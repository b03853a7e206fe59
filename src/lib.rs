// ABOUTME: Larder server library - smart kitchen inventory API
// ABOUTME: Consumption tracking, refill prediction, AI shopping lists and meal plans
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Larder Server
//!
//! HTTP API for household grocery tracking: log consumption events, predict
//! when items run out, compose AI-enriched shopping lists, and generate
//! meal plans. The algorithmic core lives in `larder-intelligence`; this
//! crate supplies the ambient machinery around it - configuration, logging,
//! sqlite storage, the LLM provider layer and the axum routes.

pub mod config;
pub mod database;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod meal_planner;
pub mod recommender;
pub mod resources;
pub mod routes;
