use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::from_row::json_column;
use super::FromSqliteRow;
use crate::validation::{Validate, ValidationErrors};

/// A workout plan. The exercise list is kept as an opaque JSON array so
/// model-generated and hand-entered plans share one shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub level: Option<String>,
    #[serde(rename = "type")]
    pub workout_type: Option<String>,
    pub image_url: Option<String>,
    pub exercises: serde_json::Value,
    pub ai_generated: bool,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            duration: row.get("duration")?,
            level: row.get("level")?,
            workout_type: row.get("workout_type")?,
            image_url: row.get("image_url")?,
            exercises: json_column(row, "exercises")?,
            ai_generated: row.get("ai_generated")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkout {
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<i32>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default, rename = "type")]
    pub workout_type: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub exercises: serde_json::Value,
    #[serde(default)]
    pub ai_generated: Option<bool>,
}

impl Validate for CreateWorkout {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.user_id.is_empty() {
            errors.add("userId", "is required");
        }
        if self.title.trim().is_empty() {
            errors.add("title", "is required");
        }
        if !self.exercises.is_array() {
            errors.add("exercises", "must be an array");
        }
        if matches!(self.duration, Some(d) if d <= 0) {
            errors.add("duration", "must be positive");
        }
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkout {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub level: Option<String>,
    #[serde(rename = "type")]
    pub workout_type: Option<String>,
    pub image_url: Option<String>,
    pub exercises: Option<serde_json::Value>,
    pub ai_generated: Option<bool>,
}

impl Validate for UpdateWorkout {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            errors.add("title", "must not be empty");
        }
        if matches!(&self.exercises, Some(e) if !e.is_array()) {
            errors.add("exercises", "must be an array");
        }
        errors.into_result()
    }
}
