// ABOUTME: Meal-planning agent - prompt assembly, JSON coercion and plan history
// ABOUTME: Model output is untrusted; fenced or prose-wrapped JSON is tolerated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! The meal-planning capability.
//!
//! Builds a structured prompt from dietary preferences, the caller's
//! inventory (flagging items about to expire), household consumption
//! patterns and recently suggested recipes, asks the LLM provider for a
//! day's plan, and coerces the reply into a [`MealPlan`]. Generated plans
//! are kept in a short rolling history so future prompts can avoid
//! repetition.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use larder_core::{InventoryItem, MealPlan, MealPlanRequest, RecipeDetails};
use larder_intelligence::{consumption_patterns, ItemConsumptionPattern};
use serde::Deserialize;
use tracing::info;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// Inventory expiring within this many days is flagged in the prompt.
const EXPIRY_FLAG_DAYS: i64 = 3;

/// How many previous plans contribute "avoid repeating these" recipes.
const RECENT_PLANS_FOR_VARIETY: usize = 3;

const SYSTEM_PROMPT: &str = "You are an expert meal planning assistant that creates \
personalized meal plans. You receive inventory items with quantities and expiry dates, \
dietary preferences and restrictions, and household consumption patterns. Create a full \
day's meal plan with breakfast, lunch, and dinner that prioritizes ingredients expiring \
soon, respects all dietary restrictions, and varies from previous suggestions. \
Format your response as a single JSON object with keys: breakfast, lunch, dinner, and \
suggested_recipes. Each recipe must use \"name\" for the recipe name, \"ingredients\" as \
an array of plain strings like \"2 cups rice\", \"instructions\" as an array of strings, \
\"dietary_tags\" as an array of strings, \"prep_time\" as an integer number of minutes, \
and \"calories\" as an integer when known.";

/// Shape the model is asked to produce; the plan date is ours, not the model's.
#[derive(Debug, Deserialize)]
struct PlanPayload {
    breakfast: RecipeDetails,
    lunch: RecipeDetails,
    dinner: RecipeDetails,
    #[serde(default)]
    suggested_recipes: Vec<RecipeDetails>,
}

/// LLM-backed meal plan generator.
pub struct MealPlanner {
    provider: Arc<dyn LlmProvider>,
    database: Arc<Database>,
}

impl MealPlanner {
    /// Create a planner over an LLM provider and the plan/log store.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, database: Arc<Database>) -> Self {
        Self { provider, database }
    }

    /// Generate a plan for the requested date (today by default), persist
    /// it to the rolling history, and return it.
    pub async fn generate(
        &self,
        request: &MealPlanRequest,
        now: DateTime<Utc>,
    ) -> AppResult<MealPlan> {
        let today = now.date_naive();
        let meal_date = request.meal_date.unwrap_or(today);

        let events = self.database.all_events().await?;
        let patterns = consumption_patterns(&events, today);
        let previous = self.database.meal_plan_history().await?;
        let recent_recipes: Vec<String> = previous
            .iter()
            .rev()
            .take(RECENT_PLANS_FOR_VARIETY)
            .flat_map(|plan| {
                [
                    plan.breakfast.name.clone(),
                    plan.lunch.name.clone(),
                    plan.dinner.name.clone(),
                ]
            })
            .collect();
        let expiring = soon_to_expire(&request.inventory, today);

        let prompt = build_prompt(request, &patterns, &recent_recipes, &expiring, meal_date)?;
        let chat = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ])
        .with_temperature(0.7);

        let response = self.provider.complete(&chat).await?;
        let payload = parse_plan_payload(&response.content)?;

        let plan = MealPlan {
            date: meal_date,
            breakfast: payload.breakfast,
            lunch: payload.lunch,
            dinner: payload.dinner,
            suggested_recipes: payload.suggested_recipes,
        };
        self.database.save_meal_plan(&plan).await?;
        info!(date = %plan.date, "generated and stored meal plan");
        Ok(plan)
    }
}

/// Inventory items expiring within [`EXPIRY_FLAG_DAYS`] of `today`,
/// rendered for the prompt.
fn soon_to_expire(inventory: &[InventoryItem], today: NaiveDate) -> Vec<String> {
    inventory
        .iter()
        .filter_map(|item| {
            let expiry = item.expiry_date?;
            let days = (expiry - today).num_days();
            (days <= EXPIRY_FLAG_DAYS)
                .then(|| format!("{} (expires in {} days)", item.item_name, days))
        })
        .collect()
}

fn build_prompt(
    request: &MealPlanRequest,
    patterns: &[ItemConsumptionPattern],
    recent_recipes: &[String],
    expiring: &[String],
    meal_date: NaiveDate,
) -> AppResult<String> {
    let preferences = &request.dietary_preferences;
    let calorie_target = preferences
        .calorie_target
        .map_or_else(|| "Not specified".to_owned(), |target| target.to_string());

    Ok(format!(
        "Create a meal plan for {meal_date} with breakfast, lunch, and dinner.\n\n\
         DIETARY PREFERENCES:\n\
         Type: {}\n\
         Avoid ingredients: {}\n\
         Preferred ingredients: {}\n\
         Calorie target: {calorie_target}\n\n\
         AVAILABLE INVENTORY:\n{}\n\n\
         SOON-TO-EXPIRE ITEMS (prioritize using these):\n{}\n\n\
         CONSUMPTION PATTERNS:\n{}\n\n\
         RECENTLY SUGGESTED RECIPES (avoid repetition):\n{}\n\n\
         Return your response as JSON only.",
        preferences.preference_type,
        preferences.avoid_ingredients.join(", "),
        preferences.preferred_ingredients.join(", "),
        serde_json::to_string_pretty(&request.inventory)?,
        if expiring.is_empty() {
            "None".to_owned()
        } else {
            expiring.join(", ")
        },
        serde_json::to_string_pretty(patterns)?,
        recent_recipes.join(", "),
    ))
}

/// Coerce a model reply into the plan payload, tolerating markdown fences
/// and surrounding prose.
fn parse_plan_payload(content: &str) -> AppResult<PlanPayload> {
    let json = extract_json(content).ok_or_else(|| {
        AppError::external_service("meal-plan", "model response contained no JSON object")
    })?;
    serde_json::from_str(json).map_err(|err| {
        AppError::external_service("meal-plan", format!("model returned a malformed plan: {err}"))
    })
}

/// Find the JSON object inside a model reply: fenced block first, then the
/// outermost brace span.
fn extract_json(content: &str) -> Option<&str> {
    let trimmed = content.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    for fence in ["```json", "```"] {
        if let Some(start) = trimmed.find(fence) {
            let inner = &trimmed[start + fence.len()..];
            if let Some(end) = inner.find("```") {
                let candidate = inner[..end].trim();
                if candidate.starts_with('{') {
                    return Some(candidate);
                }
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use larder_core::DietaryPreferences;

    const PLAN_JSON: &str = r#"{
        "breakfast": {"name": "Porridge", "ingredients": ["1 cup oats"], "instructions": ["Simmer."]},
        "lunch": {"name": "Fried Rice", "ingredients": ["2 cups rice", "2 eggs"], "instructions": ["Fry."]},
        "dinner": {"name": "Soup", "ingredients": ["3 tomatoes"], "instructions": ["Boil."]}
    }"#;

    #[test]
    fn bare_json_is_accepted() {
        let payload = parse_plan_payload(PLAN_JSON).unwrap();
        assert_eq!(payload.breakfast.name, "Porridge");
        assert!(payload.suggested_recipes.is_empty());
    }

    #[test]
    fn fenced_json_is_unwrapped() {
        let fenced = format!("Here is your plan:\n```json\n{PLAN_JSON}\n```\nEnjoy!");
        let payload = parse_plan_payload(&fenced).unwrap();
        assert_eq!(payload.lunch.name, "Fried Rice");
    }

    #[test]
    fn prose_wrapped_json_is_extracted() {
        let wrapped = format!("Sure! {PLAN_JSON} Hope that helps.");
        let payload = parse_plan_payload(&wrapped).unwrap();
        assert_eq!(payload.dinner.name, "Soup");
    }

    #[test]
    fn non_json_replies_are_rejected() {
        assert!(parse_plan_payload("I cannot help with that.").is_err());
    }

    #[test]
    fn expiring_items_are_flagged() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let inventory = vec![
            InventoryItem {
                item_name: "Tomatoes".into(),
                quantity: 5.0,
                unit: "pieces".into(),
                expiry_date: NaiveDate::from_ymd_opt(2025, 3, 17),
            },
            InventoryItem {
                item_name: "Rice".into(),
                quantity: 500.0,
                unit: "g".into(),
                expiry_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            },
            InventoryItem {
                item_name: "Salt".into(),
                quantity: 1.0,
                unit: "kg".into(),
                expiry_date: None,
            },
        ];
        let flagged = soon_to_expire(&inventory, today);
        assert_eq!(flagged, vec!["Tomatoes (expires in 2 days)"]);
    }

    #[test]
    fn prompt_carries_preferences_and_expiry_flags() {
        let request = MealPlanRequest {
            dietary_preferences: DietaryPreferences {
                preference_type: "vegetarian".into(),
                avoid_ingredients: vec!["nuts".into()],
                preferred_ingredients: vec!["vegetables".into()],
                calorie_target: Some(2000),
            },
            inventory: vec![],
            meal_date: None,
        };
        let prompt = build_prompt(
            &request,
            &[],
            &["Porridge".into()],
            &["Tomatoes (expires in 2 days)".into()],
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        )
        .unwrap();
        assert!(prompt.contains("vegetarian"));
        assert!(prompt.contains("nuts"));
        assert!(prompt.contains("2000"));
        assert!(prompt.contains("Tomatoes (expires in 2 days)"));
        assert!(prompt.contains("Porridge"));
    }
}
