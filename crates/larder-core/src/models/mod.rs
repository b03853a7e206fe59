// ABOUTME: Model module wiring for the larder-core crate
// ABOUTME: Re-exports the consumption, inventory, meal-plan and shopping types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Domain model types.

mod consumption;
mod inventory;
mod meal_plan;
mod shopping;

pub use consumption::ConsumptionEvent;
pub use inventory::InventoryItem;
pub use meal_plan::{DietaryPreferences, MealPlan, MealPlanRequest, RecipeDetails};
pub use shopping::{CategorizedShoppingList, EntrySource, ShoppingListEntry};
