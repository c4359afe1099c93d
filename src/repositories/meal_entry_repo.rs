use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{CreateMealEntry, FromSqliteRow, MealEntry, UpdateMealEntry};

#[derive(Clone)]
pub struct MealEntryRepository {
    pool: DbPool,
}

impl MealEntryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<MealEntry>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM meal_entries WHERE id = ?")?;
            let result = stmt.query_row([&id], MealEntry::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<MealEntry>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM meal_entries WHERE user_id = ?
                 ORDER BY entry_date DESC, created_at DESC",
            )?;
            let entries = stmt
                .query_map([&user_id], MealEntry::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_plan(&self, plan_id: &str) -> Result<Vec<MealEntry>> {
        let pool = self.pool.clone();
        let plan_id = plan_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM meal_entries WHERE plan_id = ?
                 ORDER BY entry_date DESC, created_at DESC",
            )?;
            let entries = stmt
                .query_map([&plan_id], MealEntry::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Entries whose stored calendar date equals `date` exactly.
    pub async fn find_by_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<MealEntry>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM meal_entries WHERE user_id = ? AND entry_date = ?
                 ORDER BY created_at DESC",
            )?;
            let entries = stmt
                .query_map(rusqlite::params![user_id, date], MealEntry::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, data: &CreateMealEntry) -> Result<MealEntry> {
        let entry = MealEntry {
            id: Uuid::new_v4().to_string(),
            user_id: data.user_id.clone(),
            plan_id: data.plan_id.clone(),
            meal_type: data.meal_type.clone(),
            name: data.name.clone(),
            calories: data.calories,
            protein: data.protein,
            carbs: data.carbs,
            fat: data.fat,
            food_items: data.food_items.clone(),
            image_url: data.image_url.clone(),
            entry_date: data.entry_date,
            created_at: Utc::now(),
        };
        let row = entry.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            let food_items = row
                .food_items
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .map_err(|e| AppError::Internal(e.to_string()))?;
            conn.execute(
                "INSERT INTO meal_entries
                 (id, user_id, plan_id, meal_type, name, calories, protein, carbs, fat, food_items, image_url, entry_date, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    row.id,
                    row.user_id,
                    row.plan_id,
                    row.meal_type,
                    row.name,
                    row.calories,
                    row.protein,
                    row.carbs,
                    row.fat,
                    food_items,
                    row.image_url,
                    row.entry_date,
                    row.created_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(entry)
    }

    pub async fn update(&self, id: &str, data: UpdateMealEntry) -> Result<Option<MealEntry>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<MealEntry>> {
            let conn = pool.get()?;
            let Some(mut entry) = load(&conn, &id)? else {
                return Ok(None);
            };

            if data.plan_id.is_some() {
                entry.plan_id = data.plan_id;
            }
            if let Some(meal_type) = data.meal_type {
                entry.meal_type = meal_type;
            }
            if let Some(name) = data.name {
                entry.name = name;
            }
            if data.calories.is_some() {
                entry.calories = data.calories;
            }
            if data.protein.is_some() {
                entry.protein = data.protein;
            }
            if data.carbs.is_some() {
                entry.carbs = data.carbs;
            }
            if data.fat.is_some() {
                entry.fat = data.fat;
            }
            if data.food_items.is_some() {
                entry.food_items = data.food_items;
            }
            if data.image_url.is_some() {
                entry.image_url = data.image_url;
            }
            if let Some(entry_date) = data.entry_date {
                entry.entry_date = entry_date;
            }

            let food_items = entry
                .food_items
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .map_err(|e| AppError::Internal(e.to_string()))?;
            conn.execute(
                "UPDATE meal_entries
                 SET plan_id = ?, meal_type = ?, name = ?, calories = ?, protein = ?, carbs = ?,
                     fat = ?, food_items = ?, image_url = ?, entry_date = ?
                 WHERE id = ?",
                rusqlite::params![
                    entry.plan_id,
                    entry.meal_type,
                    entry.name,
                    entry.calories,
                    entry.protein,
                    entry.carbs,
                    entry.fat,
                    food_items,
                    entry.image_url,
                    entry.entry_date,
                    entry.id
                ],
            )?;
            Ok(Some(entry))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM meal_entries WHERE id = ?", [&id])?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn load(conn: &Connection, id: &str) -> Result<Option<MealEntry>> {
    let mut stmt = conn.prepare("SELECT * FROM meal_entries WHERE id = ?")?;
    let result = stmt.query_row([id], MealEntry::from_row).optional()?;
    Ok(result)
}
