// ABOUTME: Meal plan models - recipes, dietary preferences and plan requests
// ABOUTME: Plans originate from the AI planning agent; the core only reads them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Meal planning types.
//!
//! A [`MealPlan`] is produced by the external planning capability and
//! treated as read-only input everywhere else. Ingredient lists are
//! free-text strings like `"2 cups rice, chopped"`; the intelligence crate
//! derives canonical ingredient names from them when reconciling against
//! inventory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::InventoryItem;

/// A single recipe within a meal plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetails {
    pub name: String,
    /// Free-text ingredient strings, e.g. `"2 cups rice"` or `"3 eggs"`
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub dietary_tags: Vec<String>,
    /// Preparation time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
}

/// A full day's meal plan with up to three meals plus alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub date: NaiveDate,
    pub breakfast: RecipeDetails,
    pub lunch: RecipeDetails,
    pub dinner: RecipeDetails,
    #[serde(default)]
    pub suggested_recipes: Vec<RecipeDetails>,
}

impl MealPlan {
    /// All free-text ingredient strings across the day's three meals.
    ///
    /// Alternatives in `suggested_recipes` are not counted; only meals the
    /// plan actually schedules contribute shopping requirements.
    #[must_use]
    pub fn scheduled_ingredients(&self) -> Vec<String> {
        [&self.breakfast, &self.lunch, &self.dinner]
            .into_iter()
            .flat_map(|meal| meal.ingredients.iter().cloned())
            .collect()
    }
}

/// Dietary constraints for meal-plan generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietaryPreferences {
    /// e.g. "vegetarian", "vegan", "gluten-free"
    pub preference_type: String,
    #[serde(default)]
    pub avoid_ingredients: Vec<String>,
    #[serde(default)]
    pub preferred_ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calorie_target: Option<u32>,
}

/// Request payload for generating a meal plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanRequest {
    pub dietary_preferences: DietaryPreferences,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    /// Defaults to today when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_date: Option<NaiveDate>,
}
