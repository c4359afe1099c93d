use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{CreateWorkoutLog, FromSqliteRow, UpdateWorkoutLog, WorkoutLog};

#[derive(Clone)]
pub struct WorkoutLogRepository {
    pool: DbPool,
}

impl WorkoutLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<WorkoutLog>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workout_logs WHERE id = ?")?;
            let result = stmt.query_row([&id], WorkoutLog::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<WorkoutLog>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn
                .prepare("SELECT * FROM workout_logs WHERE user_id = ? ORDER BY started_at DESC")?;
            let logs = stmt
                .query_map([&user_id], WorkoutLog::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(logs)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_workout(&self, workout_id: &str) -> Result<Vec<WorkoutLog>> {
        let pool = self.pool.clone();
        let workout_id = workout_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workout_logs WHERE workout_id = ? ORDER BY started_at DESC",
            )?;
            let logs = stmt
                .query_map([&workout_id], WorkoutLog::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(logs)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, data: &CreateWorkoutLog) -> Result<WorkoutLog> {
        let log = WorkoutLog {
            id: Uuid::new_v4().to_string(),
            user_id: data.user_id.clone(),
            workout_id: data.workout_id.clone(),
            completed: data.completed.unwrap_or(false),
            started_at: data.started_at.unwrap_or_else(Utc::now),
            completed_at: data.completed_at,
            feedback: data.feedback.clone(),
            rating: data.rating,
            calories_burned: data.calories_burned,
        };
        let row = log.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO workout_logs
                 (id, user_id, workout_id, completed, started_at, completed_at, feedback, rating, calories_burned)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    row.id,
                    row.user_id,
                    row.workout_id,
                    row.completed,
                    row.started_at,
                    row.completed_at,
                    row.feedback,
                    row.rating,
                    row.calories_burned
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(log)
    }

    pub async fn update(&self, id: &str, data: UpdateWorkoutLog) -> Result<Option<WorkoutLog>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<WorkoutLog>> {
            let conn = pool.get()?;
            let Some(mut log) = load(&conn, &id)? else {
                return Ok(None);
            };

            if let Some(completed) = data.completed {
                log.completed = completed;
            }
            if let Some(started_at) = data.started_at {
                log.started_at = started_at;
            }
            if data.completed_at.is_some() {
                log.completed_at = data.completed_at;
            }
            if data.feedback.is_some() {
                log.feedback = data.feedback;
            }
            if data.rating.is_some() {
                log.rating = data.rating;
            }
            if data.calories_burned.is_some() {
                log.calories_burned = data.calories_burned;
            }

            conn.execute(
                "UPDATE workout_logs
                 SET completed = ?, started_at = ?, completed_at = ?, feedback = ?, rating = ?, calories_burned = ?
                 WHERE id = ?",
                rusqlite::params![
                    log.completed,
                    log.started_at,
                    log.completed_at,
                    log.feedback,
                    log.rating,
                    log.calories_burned,
                    log.id
                ],
            )?;
            Ok(Some(log))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn load(conn: &Connection, id: &str) -> Result<Option<WorkoutLog>> {
    let mut stmt = conn.prepare("SELECT * FROM workout_logs WHERE id = ?")?;
    let result = stmt.query_row([id], WorkoutLog::from_row).optional()?;
    Ok(result)
}
