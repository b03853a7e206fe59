// ABOUTME: Shopping list composer - fuses predictions, inventory, meal plans and AI suggestions
// ABOUTME: Produces a prioritized, deduplicated list partitioned into urgency buckets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Shopping list composition.
//!
//! The composer runs the usage-rate estimator across every tracked item,
//! keeps those below the caller's urgency threshold, reconciles meal-plan
//! ingredients against what the household already has, folds in
//! complementary suggestions from the recommendation capability, and
//! partitions the result into mutually exclusive urgency buckets.
//!
//! Suggestion lookups are independent of each other and are issued
//! concurrently, bounded by a per-request cap (most urgent items first).
//! One failed lookup resolves to an empty suggestion list for that item;
//! it never aborts the composed result.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use larder_core::{CategorizedShoppingList, ConsumptionEvent, EntrySource, InventoryItem, ShoppingListEntry};
use tracing::{debug, warn};

use crate::errors::CapabilityError;
use crate::estimator::{group_by_item, UsageRateEstimator};
use crate::ingredient::normalize_ingredient;
use crate::matching::{matches_any, names_match};

/// Shared default urgency threshold for every shopping-list entry point.
///
/// The threshold is always an explicit parameter; this constant only backs
/// the HTTP-level default so the entry points cannot drift apart.
pub const DEFAULT_URGENCY_THRESHOLD_DAYS: f64 = 5.0;

/// External recommendation capability: related item names for one item.
///
/// Implementations may be slow, may fail, and may return unrelated or
/// duplicate names; the composer tolerates all three.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Return 0-3 item names commonly bought together with `item_name`.
    async fn suggest_similar(&self, item_name: &str) -> Result<Vec<String>, CapabilityError>;
}

/// Tuning knobs for composition.
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Entries at or below this many days-left are classified urgent
    pub urgent_cutoff_days: f64,
    /// How many distinct items get a suggestion lookup per request
    pub max_suggestion_lookups: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            urgent_cutoff_days: 2.0,
            max_suggestion_lookups: 5,
        }
    }
}

/// Inputs for one composition request. All request-scoped; the composer
/// is a pure function of this snapshot plus the recommendation capability.
#[derive(Debug, Clone)]
pub struct ComposeRequest<'a> {
    /// Full consumption log snapshot
    pub events: &'a [ConsumptionEvent],
    /// Caller-supplied inventory; quantities supersede log-derived stock
    pub inventory: &'a [InventoryItem],
    /// Items below this many days-to-empty go on the list
    pub urgency_threshold_days: f64,
    /// Free-text ingredient strings from today's meal plan, if any
    pub meal_plan_ingredients: Option<&'a [String]>,
    /// Reference time for refill dates
    pub now: DateTime<Utc>,
}

/// The shopping list composer.
#[derive(Debug, Clone, Default)]
pub struct ShoppingListComposer {
    config: ComposerConfig,
}

impl ShoppingListComposer {
    /// Create a composer with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a composer with explicit tuning.
    #[must_use]
    pub const fn with_config(config: ComposerConfig) -> Self {
        Self { config }
    }

    /// Compose the full categorized shopping list.
    pub async fn compose(
        &self,
        recommender: &dyn Recommender,
        request: ComposeRequest<'_>,
    ) -> CategorizedShoppingList {
        let mut entries = self.predicted_entries(&request);
        self.append_meal_plan_requirements(&mut entries, &request);
        sort_by_urgency(&mut entries);

        self.attach_suggestions(recommender, &mut entries).await;
        self.append_complementary_entries(&mut entries, request.inventory);
        sort_by_urgency(&mut entries);

        partition(entries, self.config.urgent_cutoff_days)
    }

    /// Compose the flat prediction-only list (no inventory, no meal plan):
    /// the most urgent items below the threshold, suggestions attached.
    pub async fn basic_list(
        &self,
        recommender: &dyn Recommender,
        events: &[ConsumptionEvent],
        urgency_threshold_days: f64,
        now: DateTime<Utc>,
    ) -> Vec<ShoppingListEntry> {
        let request = ComposeRequest {
            events,
            inventory: &[],
            urgency_threshold_days,
            meal_plan_ingredients: None,
            now,
        };
        let mut entries = self.predicted_entries(&request);
        sort_by_urgency(&mut entries);
        entries.truncate(self.config.max_suggestion_lookups);
        self.attach_suggestions(recommender, &mut entries).await;
        entries
    }

    /// Run the estimator per item, substituting inventory-override stock
    /// readings, and keep everything below the urgency threshold.
    fn predicted_entries(&self, request: &ComposeRequest<'_>) -> Vec<ShoppingListEntry> {
        let estimator = UsageRateEstimator::new(request.now);
        let overrides: HashMap<String, f64> = request
            .inventory
            .iter()
            .map(|item| (item.item_name.to_lowercase(), item.quantity))
            .collect();

        let mut entries = Vec::new();
        for (item_name, history) in group_by_item(request.events) {
            let stock_override = overrides.get(&item_name.to_lowercase()).copied();
            let profile = match estimator.estimate_with_stock(&item_name, &history, stock_override)
            {
                Ok(profile) => profile,
                Err(err) => {
                    debug!(item = %item_name, %err, "skipping item in shopping list");
                    continue;
                }
            };

            if profile.days_until_empty < request.urgency_threshold_days {
                entries.push(ShoppingListEntry {
                    item_name: profile.item_name,
                    refill_by: Some(profile.refill_date.date_naive()),
                    remaining_stock: Some(profile.latest_remaining_stock),
                    daily_usage: Some(profile.avg_daily_usage),
                    days_left: Some(profile.days_until_empty),
                    suggested_similar_items: Vec::new(),
                    source: EntrySource::ConsumptionPrediction,
                });
            }
        }
        entries
    }

    /// Add meal-plan ingredients the household neither stocks nor tracks.
    ///
    /// Matching uses the containment rule against the union of inventory
    /// names and every item name the log has ever seen. Unmatched
    /// ingredients are needed today: `days_left = 0`, distinct from the
    /// unknown (`None`) carried by complementary suggestions.
    fn append_meal_plan_requirements(
        &self,
        entries: &mut Vec<ShoppingListEntry>,
        request: &ComposeRequest<'_>,
    ) {
        let Some(ingredients) = request.meal_plan_ingredients else {
            return;
        };

        let mut known: Vec<String> = request
            .inventory
            .iter()
            .map(|item| item.item_name.to_lowercase())
            .collect();
        known.extend(group_by_item(request.events).into_keys().map(|name| name.to_lowercase()));

        let mut seen = HashSet::new();
        for raw in ingredients {
            let name = normalize_ingredient(raw);
            if name.is_empty() || !seen.insert(name.clone()) {
                continue;
            }
            if matches_any(&name, known.iter().map(String::as_str)) {
                continue;
            }
            if entries
                .iter()
                .any(|entry| entry.item_name.eq_ignore_ascii_case(&name))
            {
                continue;
            }
            entries.push(ShoppingListEntry {
                item_name: title_case(&name),
                refill_by: Some(request.now.date_naive()),
                remaining_stock: Some(0.0),
                daily_usage: None,
                days_left: Some(0.0),
                suggested_similar_items: Vec::new(),
                source: EntrySource::MealPlanRequirement,
            });
        }
    }

    /// Fetch suggestions for the most urgent entries, concurrently, and
    /// attach them by name (containment fallback for renamed keys).
    async fn attach_suggestions(
        &self,
        recommender: &dyn Recommender,
        entries: &mut [ShoppingListEntry],
    ) {
        let mut targets: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for entry in entries.iter() {
            if targets.len() >= self.config.max_suggestion_lookups {
                break;
            }
            if seen.insert(entry.item_name.to_lowercase()) {
                targets.push(entry.item_name.clone());
            }
        }

        let lookups = targets.iter().map(|name| async move {
            match recommender.suggest_similar(name).await {
                Ok(suggestions) => (name.to_lowercase(), suggestions),
                Err(err) => {
                    warn!(item = %name, %err, "recommendation lookup failed; continuing without suggestions");
                    (name.to_lowercase(), Vec::new())
                }
            }
        });
        let results: HashMap<String, Vec<String>> = join_all(lookups).await.into_iter().collect();

        for entry in entries.iter_mut() {
            let key = entry.item_name.to_lowercase();
            if let Some(suggestions) = results.get(&key) {
                entry.suggested_similar_items = suggestions.clone();
            } else if let Some((_, suggestions)) =
                results.iter().find(|(known, _)| names_match(known, &key))
            {
                entry.suggested_similar_items = suggestions.clone();
            }
        }
    }

    /// Append suggested items not already on the list or in inventory as
    /// complementary entries with unknown urgency.
    fn append_complementary_entries(
        &self,
        entries: &mut Vec<ShoppingListEntry>,
        inventory: &[InventoryItem],
    ) {
        let mut candidates = Vec::new();
        let mut seen = HashSet::new();
        for entry in entries.iter() {
            for suggestion in &entry.suggested_similar_items {
                let lower = suggestion.trim().to_lowercase();
                if !lower.is_empty() && seen.insert(lower.clone()) {
                    candidates.push(lower);
                }
            }
        }

        for candidate in candidates {
            if entries
                .iter()
                .any(|entry| entry.item_name.to_lowercase() == candidate)
            {
                continue;
            }
            if inventory
                .iter()
                .any(|item| item.item_name.to_lowercase() == candidate)
            {
                continue;
            }
            entries.push(ShoppingListEntry {
                item_name: title_case(&candidate),
                refill_by: None,
                remaining_stock: None,
                daily_usage: None,
                days_left: None,
                suggested_similar_items: Vec::new(),
                source: EntrySource::ComplementarySuggestion,
            });
        }
    }
}

/// Sort by `days_left` ascending with `None` (unknown) last; ties break by
/// item name so repeated runs over the same snapshot agree.
fn sort_by_urgency(entries: &mut [ShoppingListEntry]) {
    entries.sort_by(|a, b| match (a.days_left, b.days_left) {
        (Some(x), Some(y)) => x
            .total_cmp(&y)
            .then_with(|| a.item_name.cmp(&b.item_name)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.item_name.cmp(&b.item_name),
    });
}

/// Partition into mutually exclusive buckets in one pass.
///
/// Provenance buckets claim their entries first (a meal-plan requirement
/// always carries `days_left = 0` and would otherwise make the meal-plan
/// bucket unreachable); remaining predictions split on the urgent cutoff.
fn partition(entries: Vec<ShoppingListEntry>, urgent_cutoff_days: f64) -> CategorizedShoppingList {
    let mut list = CategorizedShoppingList::default();
    for entry in entries {
        match entry.source {
            EntrySource::MealPlanRequirement => list.meal_plan_items.push(entry),
            EntrySource::ComplementarySuggestion => list.complementary_suggestions.push(entry),
            EntrySource::ConsumptionPrediction => {
                if entry.days_left.is_some_and(|days| days <= urgent_cutoff_days) {
                    list.urgent_items.push(entry);
                } else {
                    list.other_items.push(entry);
                }
            }
        }
    }
    list
}

fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    /// Recommender with canned answers; unknown items fail the call.
    struct StubRecommender {
        canned: HashMap<String, Vec<String>>,
    }

    impl StubRecommender {
        fn new(pairs: &[(&str, &[&str])]) -> Self {
            let canned = pairs
                .iter()
                .map(|(item, suggestions)| {
                    (
                        (*item).to_lowercase(),
                        suggestions.iter().map(ToString::to_string).collect(),
                    )
                })
                .collect();
            Self { canned }
        }

        fn empty() -> Self {
            Self {
                canned: HashMap::new(),
            }
        }
    }

    #[async_trait]
    impl Recommender for StubRecommender {
        async fn suggest_similar(&self, item_name: &str) -> Result<Vec<String>, CapabilityError> {
            self.canned
                .get(&item_name.to_lowercase())
                .cloned()
                .ok_or_else(|| CapabilityError::Unavailable("stub has no answer".into()))
        }
    }

    fn history(name: &str, stocks: [f64; 3]) -> Vec<ConsumptionEvent> {
        vec![
            ConsumptionEvent::new(name, date(2025, 3, 1), 1.0, stocks[0]),
            ConsumptionEvent::new(name, date(2025, 3, 5), 1.0, stocks[1]),
            ConsumptionEvent::new(name, date(2025, 3, 10), 1.0, stocks[2]),
        ]
    }

    fn request<'a>(
        events: &'a [ConsumptionEvent],
        inventory: &'a [InventoryItem],
        meal_plan: Option<&'a [String]>,
    ) -> ComposeRequest<'a> {
        ComposeRequest {
            events,
            inventory,
            urgency_threshold_days: DEFAULT_URGENCY_THRESHOLD_DAYS,
            meal_plan_ingredients: meal_plan,
            now: fixed_now(),
        }
    }

    #[tokio::test]
    async fn sufficient_stock_yields_empty_list() {
        // Plenty of stock: ~0.48/day usage against 300 units.
        let events = history("Milk", [302.0, 301.0, 300.0]);
        let list = ShoppingListComposer::new()
            .compose(&StubRecommender::empty(), request(&events, &[], None))
            .await;
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn low_stock_item_lands_in_a_bucket() {
        let events = history("Milk", [5.0, 4.0, 1.0]);
        let list = ShoppingListComposer::new()
            .compose(&StubRecommender::empty(), request(&events, &[], None))
            .await;
        assert_eq!(list.total_items(), 1);
        // ~2.07 days left at 1/0.4833 rate: below threshold, above cutoff.
        let entry = &list.other_items[0];
        assert_eq!(entry.item_name, "Milk");
        assert_eq!(entry.source, EntrySource::ConsumptionPrediction);
        assert!(entry.days_left.unwrap() < DEFAULT_URGENCY_THRESHOLD_DAYS);
    }

    #[tokio::test]
    async fn zero_quantity_override_is_urgent() {
        // Log says 300 units on hand; the caller's inventory says none.
        let events = history("Milk", [302.0, 301.0, 300.0]);
        let inventory = vec![InventoryItem {
            item_name: "milk".into(),
            quantity: 0.0,
            unit: "l".into(),
            expiry_date: None,
        }];
        let list = ShoppingListComposer::new()
            .compose(&StubRecommender::empty(), request(&events, &inventory, None))
            .await;
        assert_eq!(list.urgent_items.len(), 1);
        assert_eq!(list.urgent_items[0].days_left, Some(0.0));
        assert_eq!(list.urgent_items[0].remaining_stock, Some(0.0));
    }

    #[tokio::test]
    async fn meal_plan_ingredient_matching_is_fuzzy() {
        let events = history("Rice", [5000.0, 4500.0, 4400.0]);
        let ingredients = vec!["2 cups rice".to_string(), "saffron".to_string()];
        let list = ShoppingListComposer::new()
            .compose(
                &StubRecommender::empty(),
                request(&events, &[], Some(&ingredients)),
            )
            .await;

        // "2 cups rice" reconciles with the logged "Rice"; saffron does not.
        assert_eq!(list.meal_plan_items.len(), 1);
        let saffron = &list.meal_plan_items[0];
        assert_eq!(saffron.item_name, "Saffron");
        assert_eq!(saffron.days_left, Some(0.0));
        assert_eq!(saffron.remaining_stock, Some(0.0));
        assert_eq!(saffron.source, EntrySource::MealPlanRequirement);
    }

    #[tokio::test]
    async fn complementary_suggestions_are_appended_with_unknown_urgency() {
        let events = history("Milk", [5.0, 4.0, 1.0]);
        let recommender = StubRecommender::new(&[("Milk", &["Cereal", "Butter"])]);
        let list = ShoppingListComposer::new()
            .compose(&recommender, request(&events, &[], None))
            .await;

        assert_eq!(list.other_items[0].suggested_similar_items, vec!["Cereal", "Butter"]);
        assert_eq!(list.complementary_suggestions.len(), 2);
        for entry in &list.complementary_suggestions {
            assert_eq!(entry.days_left, None);
            assert_eq!(entry.remaining_stock, None);
            assert_eq!(entry.source, EntrySource::ComplementarySuggestion);
        }
    }

    #[tokio::test]
    async fn suggested_items_already_in_inventory_are_not_appended() {
        let events = history("Milk", [5.0, 4.0, 1.0]);
        let inventory = vec![InventoryItem {
            item_name: "Butter".into(),
            quantity: 2.0,
            unit: "pack".into(),
            expiry_date: None,
        }];
        let recommender = StubRecommender::new(&[("Milk", &["Butter", "Cereal"])]);
        let list = ShoppingListComposer::new()
            .compose(&recommender, request(&events, &inventory, None))
            .await;
        let names: Vec<&str> = list
            .complementary_suggestions
            .iter()
            .map(|entry| entry.item_name.as_str())
            .collect();
        assert_eq!(names, vec!["Cereal"]);
    }

    #[tokio::test]
    async fn failed_lookups_degrade_to_empty_suggestions() {
        let events = history("Milk", [5.0, 4.0, 1.0]);
        // StubRecommender::empty() errors for every item.
        let list = ShoppingListComposer::new()
            .compose(&StubRecommender::empty(), request(&events, &[], None))
            .await;
        assert_eq!(list.total_items(), 1);
        assert!(list.other_items[0].suggested_similar_items.is_empty());
    }

    #[tokio::test]
    async fn composition_is_idempotent() {
        let mut events = history("Milk", [5.0, 4.0, 1.0]);
        events.extend(history("Bread", [3.0, 2.0, 1.0]));
        let ingredients = vec!["saffron".to_string()];
        let recommender = StubRecommender::new(&[("Milk", &["Cereal"]), ("Bread", &["Jam"])]);
        let composer = ShoppingListComposer::new();

        let first = composer
            .compose(&recommender, request(&events, &[], Some(&ingredients)))
            .await;
        let second = composer
            .compose(&recommender, request(&events, &[], Some(&ingredients)))
            .await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn buckets_are_mutually_exclusive() {
        let mut events = history("Milk", [5.0, 4.0, 1.0]);
        events.extend(history("Bread", [3.0, 2.0, 1.0]));
        let ingredients = vec!["saffron".to_string()];
        let recommender = StubRecommender::new(&[("Milk", &["Cereal"])]);
        let list = ShoppingListComposer::new()
            .compose(&recommender, request(&events, &[], Some(&ingredients)))
            .await;

        let mut seen = HashSet::new();
        for entry in list
            .urgent_items
            .iter()
            .chain(&list.meal_plan_items)
            .chain(&list.other_items)
            .chain(&list.complementary_suggestions)
        {
            assert!(seen.insert(entry.item_name.clone()), "{} appears twice", entry.item_name);
        }
    }

    #[tokio::test]
    async fn basic_list_caps_entries_and_sorts_by_urgency() {
        let mut events = Vec::new();
        for (index, name) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            // Staggered stock levels so urgency differs per item.
            let stock = 1.0 + index as f64 * 0.3;
            events.extend(history(name, [stock + 2.0, stock + 1.0, stock]));
        }
        let composer = ShoppingListComposer::new();
        let entries = composer
            .basic_list(
                &StubRecommender::empty(),
                &events,
                DEFAULT_URGENCY_THRESHOLD_DAYS,
                fixed_now(),
            )
            .await;
        assert_eq!(entries.len(), 5);
        let days: Vec<f64> = entries.iter().map(|e| e.days_left.unwrap()).collect();
        assert!(days.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("olive oil"), "Olive Oil");
        assert_eq!(title_case("saffron"), "Saffron");
    }
}
