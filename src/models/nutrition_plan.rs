use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::from_row::json_column;
use super::FromSqliteRow;
use crate::validation::{Validate, ValidationErrors};

/// Daily macro targets plus a meal-slot keyed recommendation blob
/// (breakfast/lunch/dinner/snacks).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionPlan {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub calorie_target: Option<i32>,
    pub protein_target: Option<i32>,
    pub carb_target: Option<i32>,
    pub fat_target: Option<i32>,
    pub recommendations: serde_json::Value,
    pub ai_generated: bool,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for NutritionPlan {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            calorie_target: row.get("calorie_target")?,
            protein_target: row.get("protein_target")?,
            carb_target: row.get("carb_target")?,
            fat_target: row.get("fat_target")?,
            recommendations: json_column(row, "recommendations")?,
            ai_generated: row.get("ai_generated")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNutritionPlan {
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub calorie_target: Option<i32>,
    #[serde(default)]
    pub protein_target: Option<i32>,
    #[serde(default)]
    pub carb_target: Option<i32>,
    #[serde(default)]
    pub fat_target: Option<i32>,
    pub recommendations: serde_json::Value,
    #[serde(default)]
    pub ai_generated: Option<bool>,
}

impl Validate for CreateNutritionPlan {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.user_id.is_empty() {
            errors.add("userId", "is required");
        }
        if self.title.trim().is_empty() {
            errors.add("title", "is required");
        }
        for (field, value) in [
            ("calorieTarget", self.calorie_target),
            ("proteinTarget", self.protein_target),
            ("carbTarget", self.carb_target),
            ("fatTarget", self.fat_target),
        ] {
            if matches!(value, Some(v) if v < 0) {
                errors.add(field, "must not be negative");
            }
        }
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNutritionPlan {
    pub title: Option<String>,
    pub description: Option<String>,
    pub calorie_target: Option<i32>,
    pub protein_target: Option<i32>,
    pub carb_target: Option<i32>,
    pub fat_target: Option<i32>,
    pub recommendations: Option<serde_json::Value>,
    pub ai_generated: Option<bool>,
}

impl Validate for UpdateNutritionPlan {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            errors.add("title", "must not be empty");
        }
        errors.into_result()
    }
}
