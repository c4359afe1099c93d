use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{CreateWorkout, FromSqliteRow, UpdateWorkout, Workout};

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?")?;
            let result = stmt.query_row([&id], Workout::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Workout>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn
                .prepare("SELECT * FROM workouts WHERE user_id = ? ORDER BY created_at DESC")?;
            let workouts = stmt
                .query_map([&user_id], Workout::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workouts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(&self, data: &CreateWorkout) -> Result<Workout> {
        let workout = Workout {
            id: Uuid::new_v4().to_string(),
            user_id: data.user_id.clone(),
            title: data.title.clone(),
            description: data.description.clone(),
            duration: data.duration,
            level: data.level.clone(),
            workout_type: data.workout_type.clone(),
            image_url: data.image_url.clone(),
            exercises: data.exercises.clone(),
            ai_generated: data.ai_generated.unwrap_or(true),
            created_at: Utc::now(),
        };
        let row = workout.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO workouts
                 (id, user_id, title, description, duration, level, workout_type, image_url, exercises, ai_generated, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    row.id,
                    row.user_id,
                    row.title,
                    row.description,
                    row.duration,
                    row.level,
                    row.workout_type,
                    row.image_url,
                    serde_json::to_string(&row.exercises)
                        .map_err(|e| AppError::Internal(e.to_string()))?,
                    row.ai_generated,
                    row.created_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(workout)
    }

    pub async fn update(&self, id: &str, data: UpdateWorkout) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<Workout>> {
            let conn = pool.get()?;
            let Some(mut workout) = load(&conn, &id)? else {
                return Ok(None);
            };

            if let Some(title) = data.title {
                workout.title = title;
            }
            if data.description.is_some() {
                workout.description = data.description;
            }
            if data.duration.is_some() {
                workout.duration = data.duration;
            }
            if data.level.is_some() {
                workout.level = data.level;
            }
            if data.workout_type.is_some() {
                workout.workout_type = data.workout_type;
            }
            if data.image_url.is_some() {
                workout.image_url = data.image_url;
            }
            if let Some(exercises) = data.exercises {
                workout.exercises = exercises;
            }
            if let Some(ai_generated) = data.ai_generated {
                workout.ai_generated = ai_generated;
            }

            conn.execute(
                "UPDATE workouts
                 SET title = ?, description = ?, duration = ?, level = ?, workout_type = ?,
                     image_url = ?, exercises = ?, ai_generated = ?
                 WHERE id = ?",
                rusqlite::params![
                    workout.title,
                    workout.description,
                    workout.duration,
                    workout.level,
                    workout.workout_type,
                    workout.image_url,
                    serde_json::to_string(&workout.exercises)
                        .map_err(|e| AppError::Internal(e.to_string()))?,
                    workout.ai_generated,
                    workout.id
                ],
            )?;
            Ok(Some(workout))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn load(conn: &Connection, id: &str) -> Result<Option<Workout>> {
    let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?")?;
    let result = stmt.query_row([id], Workout::from_row).optional()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;
    use serde_json::json;

    fn setup_test_db() -> DbPool {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        pool
    }

    fn create_test_user(pool: &DbPool, user_id: &str) {
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO users (id, username, password_hash, first_name, created_at)
             VALUES (?, ?, 'hash', 'Test', datetime('now'))",
            rusqlite::params![user_id, format!("user_{}", user_id)],
        )
        .unwrap();
    }

    fn new_workout(user_id: &str) -> CreateWorkout {
        CreateWorkout {
            user_id: user_id.to_string(),
            title: "Push Day".to_string(),
            description: Some("Chest and triceps".to_string()),
            duration: Some(45),
            level: Some("Beginner".to_string()),
            workout_type: Some("Strength".to_string()),
            image_url: None,
            exercises: json!([
                {"name": "Bench Press", "sets": 3, "reps": 8, "restTime": 90,
                 "instructions": "Lower the bar to mid-chest.", "tip": "Keep your feet planted."},
                {"name": "Overhead Press", "sets": 3, "reps": 10, "restTime": 60,
                 "instructions": "Press straight overhead.", "tip": "Brace your core."}
            ]),
            ai_generated: None,
        }
    }

    #[tokio::test]
    async fn test_exercises_round_trip() {
        let pool = setup_test_db();
        create_test_user(&pool, "u1");
        let repo = WorkoutRepository::new(pool);

        let data = new_workout("u1");
        let expected = data.exercises.clone();
        let created = repo.create(&data).await.unwrap();

        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.exercises, expected);
        assert!(found.ai_generated);
    }

    #[tokio::test]
    async fn test_find_by_user_newest_first() {
        let pool = setup_test_db();
        create_test_user(&pool, "u1");
        let repo = WorkoutRepository::new(pool.clone());

        let first = repo.create(&new_workout("u1")).await.unwrap();
        // push the second workout later in time so the ordering is deterministic
        {
            let conn = pool.get().unwrap();
            conn.execute(
                "UPDATE workouts SET created_at = datetime('now', '-1 hour') WHERE id = ?",
                [&first.id],
            )
            .unwrap();
        }
        let second = repo.create(&new_workout("u1")).await.unwrap();

        let workouts = repo.find_by_user("u1").await.unwrap();
        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].id, second.id);
    }

    #[tokio::test]
    async fn test_update_merges_supplied_fields() {
        let pool = setup_test_db();
        create_test_user(&pool, "u1");
        let repo = WorkoutRepository::new(pool);

        let created = repo.create(&new_workout("u1")).await.unwrap();
        let updated = repo
            .update(
                &created.id,
                UpdateWorkout {
                    title: Some("Pull Day".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Pull Day");
        assert_eq!(updated.description.as_deref(), Some("Chest and triceps"));
        assert_eq!(updated.exercises, created.exercises);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_none() {
        let pool = setup_test_db();
        let repo = WorkoutRepository::new(pool);

        let result = repo
            .update("nonexistent", UpdateWorkout::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
