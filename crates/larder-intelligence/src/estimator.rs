// ABOUTME: Usage-rate estimator - average daily consumption and time-to-empty per item
// ABOUTME: The single group-by computation every higher-level read path delegates to
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! The usage-rate estimator.
//!
//! Given the ordered consumption history of one item, computes a simple
//! moving-average daily usage rate and a remaining-stock-based time to
//! empty. This is deliberately not a forecasting model: no confidence
//! intervals, no seasonality, just the mean of per-event instantaneous
//! rates over observed gaps.
//!
//! All higher-level read paths (single-item prediction, fleet-wide ranking,
//! shopping-list composition) delegate here instead of re-deriving the
//! group-by math themselves.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use larder_core::ConsumptionEvent;
use serde::Serialize;

use crate::errors::{InvalidDataReason, PredictionError, MIN_EVENTS_FOR_PREDICTION};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Derived usage profile for one item. Request-scoped; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemUsageProfile {
    /// Item the profile describes
    pub item_name: String,
    /// Mean of the per-event daily usage rates
    pub avg_daily_usage: f64,
    /// Stock reading the time-to-empty was computed from (log-derived, or
    /// the caller's inventory override when one was supplied)
    pub latest_remaining_stock: f64,
    /// Fractional days until the stock reading reaches zero
    pub days_until_empty: f64,
    /// Reference time plus [`Self::days_until_empty`]
    pub refill_date: DateTime<Utc>,
}

/// Stateless estimator bound to a reference time.
///
/// Holding "now" on the estimator keeps every derived date a pure function
/// of the event snapshot, which is what makes the read paths reproducible
/// in tests.
#[derive(Debug, Clone, Copy)]
pub struct UsageRateEstimator {
    now: DateTime<Utc>,
}

impl UsageRateEstimator {
    /// Create an estimator that resolves refill dates against `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// The estimator's reference time.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Estimate the usage profile from one item's full event history.
    ///
    /// Requires at least [`MIN_EVENTS_FOR_PREDICTION`] events. A zero-day
    /// gap between events is normalized to one day, as is the first event's
    /// undefined gap. Non-finite per-event rates are discarded before
    /// averaging; a non-positive mean rate or a depleted last stock reading
    /// yields [`PredictionError::InvalidData`] rather than a zero, negative
    /// or infinite time-to-empty.
    pub fn estimate(
        &self,
        item_name: &str,
        events: &[ConsumptionEvent],
    ) -> Result<ItemUsageProfile, PredictionError> {
        self.estimate_with_stock(item_name, events, None)
    }

    /// Estimate with an optional caller-supplied stock reading.
    ///
    /// An override substitutes the stock reading before the time-to-empty
    /// division and bypasses the depleted-stock guard, so an override of
    /// zero produces `days_until_empty = 0` (run out now) instead of
    /// invalid data. The usage rate always comes from the log.
    pub fn estimate_with_stock(
        &self,
        item_name: &str,
        events: &[ConsumptionEvent],
        stock_override: Option<f64>,
    ) -> Result<ItemUsageProfile, PredictionError> {
        if events.len() < MIN_EVENTS_FOR_PREDICTION {
            return Err(PredictionError::InsufficientData {
                events: events.len(),
            });
        }

        let mut ordered: Vec<&ConsumptionEvent> = events.iter().collect();
        ordered.sort_by_key(|event| event.date_consumed);

        let mut rates = Vec::with_capacity(ordered.len());
        let mut previous: Option<NaiveDate> = None;
        for event in &ordered {
            let gap_days = previous
                .map(|prev| (event.date_consumed - prev).num_days())
                .filter(|days| *days > 0)
                .unwrap_or(1);
            previous = Some(event.date_consumed);

            let rate = event.quantity_used / gap_days as f64;
            if rate.is_finite() {
                rates.push(rate);
            }
        }

        if rates.is_empty() {
            return Err(PredictionError::InvalidData(InvalidDataReason::NoUsableRates));
        }

        let avg_daily_usage = rates.iter().sum::<f64>() / rates.len() as f64;
        if avg_daily_usage <= 0.0 {
            return Err(PredictionError::InvalidData(
                InvalidDataReason::NonPositiveUsageRate,
            ));
        }

        // Sort is stable, so the chronologically last event wins date ties
        // by insertion order.
        let logged_stock = ordered
            .last()
            .map_or(0.0, |event| event.remaining_stock);
        if stock_override.is_none() && logged_stock <= 0.0 {
            return Err(PredictionError::InvalidData(
                InvalidDataReason::DepletedStockReading,
            ));
        }
        let latest_remaining_stock = stock_override.unwrap_or(logged_stock);

        let days_until_empty = latest_remaining_stock / avg_daily_usage;
        let offset = Duration::try_seconds((days_until_empty * SECONDS_PER_DAY) as i64)
            .unwrap_or(Duration::MAX);
        let refill_date = self
            .now
            .checked_add_signed(offset)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Ok(ItemUsageProfile {
            item_name: item_name.to_owned(),
            avg_daily_usage,
            latest_remaining_stock,
            days_until_empty,
            refill_date,
        })
    }
}

/// Group a full consumption log by item name, preserving per-item insertion
/// order. `BTreeMap` keeps iteration deterministic across calls.
#[must_use]
pub fn group_by_item(events: &[ConsumptionEvent]) -> BTreeMap<String, Vec<ConsumptionEvent>> {
    let mut groups: BTreeMap<String, Vec<ConsumptionEvent>> = BTreeMap::new();
    for event in events {
        groups
            .entry(event.item_name.clone())
            .or_default()
            .push(event.clone());
    }
    groups
}

/// Per-item consumption rhythm summary, used to brief the meal-planning
/// agent on household habits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemConsumptionPattern {
    pub item_name: String,
    /// Mean gap in days between consecutive consumption events
    pub avg_frequency_days: f64,
    pub last_used: NaiveDate,
    /// Mean quantity consumed per event
    pub avg_quantity: f64,
    pub days_since_last_use: i64,
}

/// Summarize consumption rhythms for every item with at least two events.
///
/// Items with a single event carry no gap information and are skipped.
#[must_use]
pub fn consumption_patterns(
    events: &[ConsumptionEvent],
    today: NaiveDate,
) -> Vec<ItemConsumptionPattern> {
    let mut patterns = Vec::new();
    for (item_name, mut group) in group_by_item(events) {
        if group.len() < 2 {
            continue;
        }
        group.sort_by_key(|event| event.date_consumed);

        let gaps: Vec<i64> = group
            .windows(2)
            .map(|pair| (pair[1].date_consumed - pair[0].date_consumed).num_days())
            .collect();
        let avg_frequency_days = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
        let avg_quantity =
            group.iter().map(|event| event.quantity_used).sum::<f64>() / group.len() as f64;
        let last_used = group
            .last()
            .map_or(today, |event| event.date_consumed);

        patterns.push(ItemConsumptionPattern {
            item_name,
            avg_frequency_days,
            last_used,
            avg_quantity,
            days_since_last_use: (today - last_used).num_days(),
        });
    }
    patterns
}
