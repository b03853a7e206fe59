// ABOUTME: Shared domain models for the Larder kitchen inventory platform
// ABOUTME: Consumption events, inventory snapshots, meal plans, shopping-list entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Larder Core
//!
//! Domain models shared between the Larder server and the consumption
//! intelligence engine. Everything in this crate is a plain value type:
//! the only entity with durable identity is [`models::ConsumptionEvent`],
//! which lives in an append-only log owned by the storage layer.

pub mod models;

pub use models::{
    CategorizedShoppingList, ConsumptionEvent, DietaryPreferences, EntrySource, InventoryItem,
    MealPlan, MealPlanRequest, RecipeDetails, ShoppingListEntry,
};
