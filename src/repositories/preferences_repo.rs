use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{CreatePreferences, FromSqliteRow, UpdatePreferences, UserPreferences};

#[derive(Clone)]
pub struct PreferencesRepository {
    pool: DbPool,
}

impl PreferencesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM user_preferences WHERE user_id = ?")?;
            let result = stmt
                .query_row([&user_id], UserPreferences::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, data: &CreatePreferences) -> Result<UserPreferences> {
        let preferences = UserPreferences {
            id: Uuid::new_v4().to_string(),
            user_id: data.user_id.clone(),
            goals: data.goals.clone(),
            experience_level: data.experience_level.clone(),
            available_equipment: data.available_equipment.clone(),
            workout_duration: data.workout_duration,
            days_per_week: data.days_per_week,
            updated_at: Utc::now(),
        };
        let row = preferences.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO user_preferences
                 (id, user_id, goals, experience_level, available_equipment, workout_duration, days_per_week, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    row.id,
                    row.user_id,
                    serde_json::to_string(&row.goals).map_err(|e| AppError::Internal(e.to_string()))?,
                    row.experience_level,
                    row.available_equipment,
                    row.workout_duration,
                    row.days_per_week,
                    row.updated_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(preferences)
    }

    /// Merge the supplied fields into the stored row, refresh `updated_at`,
    /// and return the merged record. `None` when the id is unknown.
    pub async fn update(
        &self,
        id: &str,
        data: UpdatePreferences,
    ) -> Result<Option<UserPreferences>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<UserPreferences>> {
            let conn = pool.get()?;
            let existing = load(&conn, &id)?;
            let Some(mut preferences) = existing else {
                return Ok(None);
            };

            if let Some(goals) = data.goals {
                preferences.goals = goals;
            }
            if let Some(level) = data.experience_level {
                preferences.experience_level = level;
            }
            if let Some(equipment) = data.available_equipment {
                preferences.available_equipment = equipment;
            }
            if data.workout_duration.is_some() {
                preferences.workout_duration = data.workout_duration;
            }
            if data.days_per_week.is_some() {
                preferences.days_per_week = data.days_per_week;
            }
            preferences.updated_at = Utc::now();

            conn.execute(
                "UPDATE user_preferences
                 SET goals = ?, experience_level = ?, available_equipment = ?,
                     workout_duration = ?, days_per_week = ?, updated_at = ?
                 WHERE id = ?",
                rusqlite::params![
                    serde_json::to_string(&preferences.goals)
                        .map_err(|e| AppError::Internal(e.to_string()))?,
                    preferences.experience_level,
                    preferences.available_equipment,
                    preferences.workout_duration,
                    preferences.days_per_week,
                    preferences.updated_at,
                    preferences.id
                ],
            )?;
            Ok(Some(preferences))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn load(conn: &Connection, id: &str) -> Result<Option<UserPreferences>> {
    let mut stmt = conn.prepare("SELECT * FROM user_preferences WHERE id = ?")?;
    let result = stmt.query_row([id], UserPreferences::from_row).optional()?;
    Ok(result)
}
