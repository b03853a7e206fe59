// ABOUTME: Shopping list models - entries, their provenance and the urgency buckets
// ABOUTME: Built fresh per composition request, never persisted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Shopping list value types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a shopping-list entry came from.
///
/// `days_left` semantics differ by source: a consumption prediction carries
/// a measured estimate, a meal-plan requirement carries `0` (needed today),
/// and a complementary suggestion carries `None` (unknown). The distinction
/// is kept through sorting and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// The usage-rate estimator predicts the item will run out soon
    ConsumptionPrediction,
    /// Today's meal plan needs an ingredient not present in inventory
    MealPlanRequirement,
    /// The recommendation capability suggested it alongside another entry
    ComplementarySuggestion,
}

/// One line of a composed shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    pub item_name: String,
    pub refill_by: Option<NaiveDate>,
    pub remaining_stock: Option<f64>,
    pub daily_usage: Option<f64>,
    pub days_left: Option<f64>,
    pub suggested_similar_items: Vec<String>,
    pub source: EntrySource,
}

impl ShoppingListEntry {
    /// Round numeric fields for presentation: daily usage to two decimals,
    /// days-left to one. The composer itself keeps full precision; rounding
    /// happens once, at the HTTP boundary.
    #[must_use]
    pub fn rounded(mut self) -> Self {
        self.daily_usage = self.daily_usage.map(|v| (v * 100.0).round() / 100.0);
        self.days_left = self.days_left.map(|v| (v * 10.0).round() / 10.0);
        self
    }
}

/// A composed shopping list partitioned into urgency buckets.
///
/// The buckets are mutually exclusive: an entry appears in exactly one,
/// with urgency taking priority over provenance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizedShoppingList {
    pub urgent_items: Vec<ShoppingListEntry>,
    pub meal_plan_items: Vec<ShoppingListEntry>,
    pub other_items: Vec<ShoppingListEntry>,
    pub complementary_suggestions: Vec<ShoppingListEntry>,
}

impl CategorizedShoppingList {
    /// Total entries across all buckets.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.urgent_items.len()
            + self.meal_plan_items.len()
            + self.other_items.len()
            + self.complementary_suggestions.len()
    }

    /// True when nothing needs buying.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    /// Apply presentation rounding to every entry.
    #[must_use]
    pub fn rounded(mut self) -> Self {
        for bucket in [
            &mut self.urgent_items,
            &mut self.meal_plan_items,
            &mut self.other_items,
            &mut self.complementary_suggestions,
        ] {
            for entry in std::mem::take(bucket) {
                bucket.push(entry.rounded());
            }
        }
        self
    }
}
