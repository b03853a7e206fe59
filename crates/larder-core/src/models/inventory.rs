// ABOUTME: Inventory snapshot model supplied by callers per composition request
// ABOUTME: Quantity supersedes the log-derived stock reading, never the usage rate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Caller-supplied inventory snapshot records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A current-inventory record supplied by the caller.
///
/// When an item in the consumption log has a matching inventory record
/// (case-insensitive name match), the record's `quantity` supersedes the
/// stock reading derived from the log. The derived usage rate is untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
}
