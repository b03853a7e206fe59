// ABOUTME: Consumption intelligence engine - prediction and shopping-list composition
// ABOUTME: Pure read paths over an immutable consumption log snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Larder Intelligence
//!
//! The consumption-prediction and shopping-list-derivation engine: a
//! moving-average usage-rate estimator over irregular time-series data,
//! its aggregation into fleet-wide depletion ranking, and its fusion with
//! caller-supplied inventory and meal-plan ingredients into a prioritized,
//! deduplicated, categorized shopping list.
//!
//! Every read path here is a pure function of a log snapshot plus
//! request-scoped inputs; nothing is cached across requests and nothing is
//! mutated. The external recommendation capability enters through the
//! [`composer::Recommender`] trait and is constructed and owned by the
//! caller.

pub mod composer;
pub mod errors;
pub mod estimator;
pub mod ingredient;
pub mod matching;
pub mod predictor;

pub use composer::{
    ComposeRequest, ComposerConfig, Recommender, ShoppingListComposer,
    DEFAULT_URGENCY_THRESHOLD_DAYS,
};
pub use errors::{
    CapabilityError, InvalidDataReason, PredictionError, RankingError, MIN_EVENTS_FOR_PREDICTION,
};
pub use estimator::{
    consumption_patterns, group_by_item, ItemConsumptionPattern, ItemUsageProfile,
    UsageRateEstimator,
};
pub use ingredient::normalize_ingredient;
pub use matching::{matches_any, names_match};
pub use predictor::{predict_refill, rank_soonest, SoonestDepletion};
