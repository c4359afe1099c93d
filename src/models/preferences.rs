use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::from_row::json_column;
use super::options::{EQUIPMENT_OPTIONS, EXPERIENCE_LEVELS};
use super::FromSqliteRow;
use crate::validation::{check_catalog, Validate, ValidationErrors};

/// Questionnaire answers for one user. The save endpoint upserts by user,
/// so at most one row per user is ever current.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub id: String,
    pub user_id: String,
    pub goals: Vec<String>,
    pub experience_level: String,
    pub available_equipment: String,
    pub workout_duration: Option<i32>,
    pub days_per_week: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl FromSqliteRow for UserPreferences {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            goals: json_column(row, "goals")?,
            experience_level: row.get("experience_level")?,
            available_equipment: row.get("available_equipment")?,
            workout_duration: row.get("workout_duration")?,
            days_per_week: row.get("days_per_week")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePreferences {
    pub user_id: String,
    pub goals: Vec<String>,
    pub experience_level: String,
    pub available_equipment: String,
    #[serde(default)]
    pub workout_duration: Option<i32>,
    #[serde(default)]
    pub days_per_week: Option<i32>,
}

impl Validate for CreatePreferences {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.user_id.is_empty() {
            errors.add("userId", "is required");
        }
        if self.goals.is_empty() {
            errors.add("goals", "must contain at least one goal");
        } else if self.goals.iter().any(|g| g.trim().is_empty()) {
            errors.add("goals", "must not contain empty entries");
        }
        check_catalog(
            &mut errors,
            "experienceLevel",
            &self.experience_level,
            EXPERIENCE_LEVELS,
        );
        check_catalog(
            &mut errors,
            "availableEquipment",
            &self.available_equipment,
            EQUIPMENT_OPTIONS,
        );
        if matches!(self.workout_duration, Some(d) if d <= 0) {
            errors.add("workoutDuration", "must be positive");
        }
        if matches!(self.days_per_week, Some(d) if d <= 0 || d > 7) {
            errors.add("daysPerWeek", "must be between 1 and 7");
        }
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferences {
    pub goals: Option<Vec<String>>,
    pub experience_level: Option<String>,
    pub available_equipment: Option<String>,
    pub workout_duration: Option<i32>,
    pub days_per_week: Option<i32>,
}

impl From<CreatePreferences> for UpdatePreferences {
    fn from(data: CreatePreferences) -> Self {
        Self {
            goals: Some(data.goals),
            experience_level: Some(data.experience_level),
            available_equipment: Some(data.available_equipment),
            workout_duration: data.workout_duration,
            days_per_week: data.days_per_week,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreatePreferences {
        CreatePreferences {
            user_id: "u1".to_string(),
            goals: vec!["Build Muscle".to_string()],
            experience_level: "Beginner".to_string(),
            available_equipment: "Full Gym Access".to_string(),
            workout_duration: Some(45),
            days_per_week: Some(3),
        }
    }

    #[test]
    fn test_valid_preferences() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_empty_goals_rejected() {
        let mut data = valid();
        data.goals.clear();
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_unknown_experience_level_rejected() {
        let mut data = valid();
        data.experience_level = "Expert".to_string();
        let errors = data.validate().unwrap_err();
        assert!(errors.fields().any(|f| f == "experienceLevel"));
    }

    #[test]
    fn test_days_per_week_range() {
        let mut data = valid();
        data.days_per_week = Some(9);
        assert!(data.validate().is_err());
    }
}
