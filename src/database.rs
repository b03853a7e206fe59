// ABOUTME: Sqlite-backed storage for the append-only consumption log and meal-plan history
// ABOUTME: Events are never mutated or deleted; duplicate appends are distinct rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Storage layer.
//!
//! The consumption log is append-only: reads and appends are independent of
//! each other's ordering, so a read taken during concurrent appends sees a
//! snapshot that may be stale but never structurally corrupt. "No data" is
//! an empty vec, never an error; only genuine I/O failure surfaces.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use larder_core::{ConsumptionEvent, MealPlan};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::errors::{AppError, AppResult};

/// How many meal plans the history retains.
const MEAL_PLAN_HISTORY_LIMIT: i64 = 10;

/// Sqlite-backed store for consumption events and meal plans.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `database_url` and run
    /// schema bootstrap.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(AppError::from)?
            .create_if_missing(true);
        // A shared in-memory database only exists per connection.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let database = Self { pool };
        database.migrate().await?;
        Ok(database)
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS consumption_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item_name TEXT NOT NULL,
                date_consumed TEXT NOT NULL,
                quantity_used REAL NOT NULL,
                remaining_stock REAL NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS meal_plans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                plan_date TEXT NOT NULL,
                payload TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Cheap connectivity probe for health checks.
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Append one consumption event. Idempotency is not guaranteed:
    /// duplicate appends become distinct events.
    pub async fn append_event(&self, event: &ConsumptionEvent) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO consumption_log (item_name, date_consumed, quantity_used, remaining_stock)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&event.item_name)
        .bind(event.date_consumed)
        .bind(event.quantity_used)
        .bind(event.remaining_stock)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// The full log, ordered by date with insertion order breaking ties.
    pub async fn all_events(&self) -> AppResult<Vec<ConsumptionEvent>> {
        let rows = sqlx::query(
            "SELECT item_name, date_consumed, quantity_used, remaining_stock
             FROM consumption_log ORDER BY date_consumed ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(event_from_row).collect()
    }

    /// One item's history (exact name match), ordered as in [`Self::all_events`].
    pub async fn events_for_item(&self, item_name: &str) -> AppResult<Vec<ConsumptionEvent>> {
        let rows = sqlx::query(
            "SELECT item_name, date_consumed, quantity_used, remaining_stock
             FROM consumption_log WHERE item_name = ?1
             ORDER BY date_consumed ASC, id ASC",
        )
        .bind(item_name)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(event_from_row).collect()
    }

    /// Every item name the log has seen, alphabetically.
    pub async fn distinct_items(&self) -> AppResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT DISTINCT item_name FROM consumption_log ORDER BY item_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| row.try_get("item_name").map_err(Into::into))
            .collect()
    }

    /// Seed the demo fixture on first run. Returns true when seeding happened.
    pub async fn seed_sample_data(&self) -> AppResult<bool> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM consumption_log")
            .fetch_one(&self.pool)
            .await?
            .try_get("n")
            .map_err(AppError::from)?;
        if count > 0 {
            return Ok(false);
        }

        for (item_name, date, quantity_used, remaining_stock) in SAMPLE_LOG {
            let event = ConsumptionEvent::new(
                *item_name,
                NaiveDate::from_str(date).map_err(|err| {
                    AppError::internal(format!("bad seed date: {err}"))
                })?,
                *quantity_used,
                *remaining_stock,
            );
            self.append_event(&event).await?;
        }
        info!(events = SAMPLE_LOG.len(), "seeded sample consumption log");
        Ok(true)
    }

    /// Persist a meal plan, trimming history to the retention limit.
    pub async fn save_meal_plan(&self, plan: &MealPlan) -> AppResult<()> {
        let payload = serde_json::to_string(plan)?;
        sqlx::query(
            "INSERT INTO meal_plans (plan_date, payload, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(plan.date.to_string())
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "DELETE FROM meal_plans WHERE id NOT IN
             (SELECT id FROM meal_plans ORDER BY id DESC LIMIT ?1)",
        )
        .bind(MEAL_PLAN_HISTORY_LIMIT)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Retained meal plans, oldest first.
    pub async fn meal_plan_history(&self) -> AppResult<Vec<MealPlan>> {
        let rows = sqlx::query("SELECT payload FROM meal_plans ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| {
                let payload: String = row.try_get("payload")?;
                Ok(payload)
            })
            .collect::<Result<Vec<String>, sqlx::Error>>()?
            .iter()
            .map(|payload| serde_json::from_str(payload).map_err(Into::into))
            .collect()
    }

    /// The most recently generated plan, if any.
    pub async fn latest_meal_plan(&self) -> AppResult<Option<MealPlan>> {
        let row = sqlx::query("SELECT payload FROM meal_plans ORDER BY id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => {
                let payload: String = row
                    .try_get("payload")
                    .map_err(AppError::from)?;
                Ok(Some(serde_json::from_str(&payload)?))
            }
            None => Ok(None),
        }
    }
}

fn event_from_row(row: &SqliteRow) -> AppResult<ConsumptionEvent> {
    Ok(ConsumptionEvent {
        item_name: row.try_get("item_name").map_err(AppError::from)?,
        date_consumed: row
            .try_get("date_consumed")
            .map_err(AppError::from)?,
        quantity_used: row
            .try_get("quantity_used")
            .map_err(AppError::from)?,
        remaining_stock: row
            .try_get("remaining_stock")
            .map_err(AppError::from)?,
    })
}

/// Demo fixture installed on an empty database, matching the sample
/// household the frontend expects.
const SAMPLE_LOG: &[(&str, &str, f64, f64)] = &[
    ("Milk", "2025-03-01", 1.0, 5.0),
    ("Milk", "2025-03-05", 1.0, 4.0),
    ("Milk", "2025-03-10", 1.0, 3.0),
    ("Eggs", "2025-03-02", 6.0, 12.0),
    ("Eggs", "2025-03-06", 6.0, 6.0),
    ("Eggs", "2025-03-09", 6.0, 0.0),
    ("Rice", "2025-03-03", 500.0, 5000.0),
    ("Rice", "2025-03-08", 500.0, 4500.0),
    ("Rice", "2025-03-13", 500.0, 4000.0),
    ("Tomatoes", "2025-03-04", 3.0, 10.0),
    ("Tomatoes", "2025-03-07", 3.0, 7.0),
    ("Tomatoes", "2025-03-11", 3.0, 4.0),
    ("Bread", "2025-03-05", 1.0, 3.0),
    ("Bread", "2025-03-08", 1.0, 2.0),
    ("Bread", "2025-03-12", 1.0, 1.0),
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use larder_core::RecipeDetails;

    async fn memory_database() -> Database {
        Database::new("sqlite::memory:").await.unwrap()
    }

    fn sample_plan(day: u32) -> MealPlan {
        let recipe = |name: &str| RecipeDetails {
            name: name.into(),
            ingredients: vec!["2 cups rice".into()],
            instructions: vec!["Cook.".into()],
            dietary_tags: vec![],
            prep_time: Some(10),
            calories: Some(400),
        };
        MealPlan {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            breakfast: recipe("Porridge"),
            lunch: recipe("Fried Rice"),
            dinner: recipe("Risotto"),
            suggested_recipes: vec![],
        }
    }

    #[tokio::test]
    async fn append_then_read_preserves_order() {
        let database = memory_database().await;
        let first = ConsumptionEvent::new(
            "Milk",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            1.0,
            5.0,
        );
        let same_day = ConsumptionEvent::new(
            "Milk",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            2.0,
            3.0,
        );
        database.append_event(&first).await.unwrap();
        database.append_event(&same_day).await.unwrap();

        let events = database.all_events().await.unwrap();
        assert_eq!(events, vec![first, same_day]);
    }

    #[tokio::test]
    async fn empty_log_reads_as_empty_not_error() {
        let database = memory_database().await;
        assert!(database.all_events().await.unwrap().is_empty());
        assert!(database.distinct_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_appends_are_distinct_events() {
        let database = memory_database().await;
        let event = ConsumptionEvent::new(
            "Milk",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            1.0,
            5.0,
        );
        database.append_event(&event).await.unwrap();
        database.append_event(&event).await.unwrap();
        assert_eq!(database.all_events().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn seeding_runs_once() {
        let database = memory_database().await;
        assert!(database.seed_sample_data().await.unwrap());
        assert!(!database.seed_sample_data().await.unwrap());
        assert_eq!(database.all_events().await.unwrap().len(), SAMPLE_LOG.len());
        let items = database.distinct_items().await.unwrap();
        assert_eq!(items, vec!["Bread", "Eggs", "Milk", "Rice", "Tomatoes"]);
    }

    #[tokio::test]
    async fn item_filter_is_exact() {
        let database = memory_database().await;
        database.seed_sample_data().await.unwrap();
        let milk = database.events_for_item("Milk").await.unwrap();
        assert_eq!(milk.len(), 3);
        assert!(database.events_for_item("milk").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn meal_plan_history_is_capped() {
        let database = memory_database().await;
        for day in 1..=12 {
            database.save_meal_plan(&sample_plan(day)).await.unwrap();
        }
        let history = database.meal_plan_history().await.unwrap();
        assert_eq!(history.len(), 10);
        // Oldest plans fall off the front.
        assert_eq!(
            history[0].date,
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
        );
        let latest = database.latest_meal_plan().await.unwrap().unwrap();
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
    }
}
