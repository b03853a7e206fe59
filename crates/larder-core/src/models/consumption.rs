// ABOUTME: Consumption event model - one record per logged kitchen consumption action
// ABOUTME: Append-only; ordering within an item is by date, ties stable by insertion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! The consumption log record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One logged consumption action for a tracked item.
///
/// Events are append-only: they are never mutated or deleted once written.
/// `remaining_stock >= 0` is expected but not enforced at this layer; the
/// estimator tolerates violations and reports them as invalid data instead
/// of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionEvent {
    /// Item the consumption applies to
    pub item_name: String,
    /// Calendar day the consumption happened
    pub date_consumed: NaiveDate,
    /// Quantity consumed by this action, in the item's own unit
    pub quantity_used: f64,
    /// Stock remaining after this action, as reported by the caller
    pub remaining_stock: f64,
}

impl ConsumptionEvent {
    /// Create a new consumption event.
    #[must_use]
    pub fn new(
        item_name: impl Into<String>,
        date_consumed: NaiveDate,
        quantity_used: f64,
        remaining_stock: f64,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            date_consumed,
            quantity_used,
            remaining_stock,
        }
    }
}
