// ABOUTME: Typed prediction outcomes for the consumption intelligence engine
// ABOUTME: Distinguishes thin history, unusable data, empty rankings and capability failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Error taxonomy for the intelligence engine.
//!
//! Per-item outcomes ([`PredictionError`]) are filtered out, never fatal,
//! when aggregating across many items; they surface verbatim when the caller
//! asked about one specific item. A [`CapabilityError`] from an external
//! agent degrades to an empty suggestion list at the call site and never
//! aborts a composed result.

use std::fmt;
use thiserror::Error;

/// Minimum number of consumption events required before any prediction.
pub const MIN_EVENTS_FOR_PREDICTION: usize = 3;

/// Why the estimator could not produce a usage profile for one item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    /// Fewer than [`MIN_EVENTS_FOR_PREDICTION`] events recorded for the item.
    #[error("not enough consumption history: {events} events recorded, {MIN_EVENTS_FOR_PREDICTION} required")]
    InsufficientData {
        /// How many events the item actually has
        events: usize,
    },

    /// History exists but no depletion estimate can be derived from it.
    #[error("invalid consumption data: {0}")]
    InvalidData(InvalidDataReason),
}

/// The specific way an item's history failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidDataReason {
    /// Every per-event rate was non-finite and had to be discarded
    NoUsableRates,
    /// The mean usage rate is zero or negative; "cannot predict", not "infinite time"
    NonPositiveUsageRate,
    /// The last recorded stock reading is zero or negative
    DepletedStockReading,
}

impl fmt::Display for InvalidDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoUsableRates => write!(f, "unable to compute a usage rate"),
            Self::NonPositiveUsageRate => write!(f, "usage rate is zero or negative"),
            Self::DepletedStockReading => write!(f, "last stock reading is zero or negative"),
        }
    }
}

/// Fleet-wide ranking found nothing to rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RankingError {
    /// Every tracked item was skipped for insufficient or invalid history.
    #[error("no item has enough valid history to predict depletion")]
    NoValidPredictions,
}

/// An external capability (recommendation or meal-plan agent) failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The capability could not be reached or returned an error
    #[error("external capability unavailable: {0}")]
    Unavailable(String),
    /// The capability did not answer within the configured deadline
    #[error("external capability timed out after {seconds}s")]
    TimedOut {
        /// The deadline that elapsed
        seconds: u64,
    },
}
