use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;
use crate::validation::{Validate, ValidationErrors};

/// One user's attempt at a workout. Created when the workout starts and
/// patched later with the completion fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    pub user_id: String,
    pub workout_id: String,
    pub completed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub feedback: Option<String>,
    pub rating: Option<i32>,
    pub calories_burned: Option<i32>,
}

impl FromSqliteRow for WorkoutLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            workout_id: row.get("workout_id")?,
            completed: row.get("completed")?,
            started_at: row.get("started_at")?,
            completed_at: row.get("completed_at")?,
            feedback: row.get("feedback")?,
            rating: row.get("rating")?,
            calories_burned: row.get("calories_burned")?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutLog {
    pub user_id: String,
    pub workout_id: String,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub calories_burned: Option<i32>,
}

fn check_rating(errors: &mut ValidationErrors, rating: Option<i32>) {
    if matches!(rating, Some(r) if !(1..=5).contains(&r)) {
        errors.add("rating", "must be between 1 and 5");
    }
}

impl Validate for CreateWorkoutLog {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.user_id.is_empty() {
            errors.add("userId", "is required");
        }
        if self.workout_id.is_empty() {
            errors.add("workoutId", "is required");
        }
        check_rating(&mut errors, self.rating);
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutLog {
    pub completed: Option<bool>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub feedback: Option<String>,
    pub rating: Option<i32>,
    pub calories_burned: Option<i32>,
}

impl Validate for UpdateWorkoutLog {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_rating(&mut errors, self.rating);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_out_of_range_rejected() {
        let update = UpdateWorkoutLog {
            rating: Some(6),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateWorkoutLog {
            rating: Some(5),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }
}
