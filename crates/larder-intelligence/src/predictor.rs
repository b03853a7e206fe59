// ABOUTME: Read paths over the estimator - single-item refill prediction and fleet ranking
// ABOUTME: Pure functions of a log snapshot; per-item errors filter out of aggregates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Refill prediction read paths.
//!
//! [`predict_refill`] answers "when will item X run out?" for one named
//! item and surfaces estimator outcomes verbatim, so a caller can render
//! "not enough history" differently from "cannot predict".
//! [`rank_soonest`] applies the estimator across every tracked item and
//! selects the single soonest-to-deplete survivor.

use chrono::{DateTime, Utc};
use larder_core::ConsumptionEvent;
use serde::Serialize;
use tracing::debug;

use crate::errors::{PredictionError, RankingError};
use crate::estimator::{group_by_item, ItemUsageProfile, UsageRateEstimator};

/// Predict the usage profile for one named item.
///
/// Filters the log snapshot to events matching `item_name` exactly and
/// delegates to the estimator. Pure read; no side effects.
pub fn predict_refill(
    item_name: &str,
    events: &[ConsumptionEvent],
    now: DateTime<Utc>,
) -> Result<ItemUsageProfile, PredictionError> {
    let history: Vec<ConsumptionEvent> = events
        .iter()
        .filter(|event| event.item_name == item_name)
        .cloned()
        .collect();
    UsageRateEstimator::new(now).estimate(item_name, &history)
}

/// The fleet-wide ranking result: the item predicted to run out first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoonestDepletion {
    pub item_name: String,
    pub days_left: f64,
    pub expiry_date: DateTime<Utc>,
}

/// Rank every tracked item by time-to-empty and return the soonest.
///
/// Items with insufficient or invalid history are skipped, never fatal.
/// Ties on `days_left` break to the lexicographically smaller item name so
/// the result does not depend on iteration order.
pub fn rank_soonest(
    events: &[ConsumptionEvent],
    now: DateTime<Utc>,
) -> Result<SoonestDepletion, RankingError> {
    let estimator = UsageRateEstimator::new(now);

    let mut soonest: Option<SoonestDepletion> = None;
    for (item_name, history) in group_by_item(events) {
        let profile = match estimator.estimate(&item_name, &history) {
            Ok(profile) => profile,
            Err(err) => {
                debug!(item = %item_name, %err, "skipping item in expiry ranking");
                continue;
            }
        };

        let candidate = SoonestDepletion {
            item_name: profile.item_name,
            days_left: profile.days_until_empty,
            expiry_date: profile.refill_date,
        };
        let replace = soonest.as_ref().is_none_or(|current| {
            candidate.days_left < current.days_left
                || (candidate.days_left == current.days_left
                    && candidate.item_name < current.item_name)
        });
        if replace {
            soonest = Some(candidate);
        }
    }

    soonest.ok_or(RankingError::NoValidPredictions)
}
