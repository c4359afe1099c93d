use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::from_row::optional_json_column;
use super::options::MEAL_TYPES;
use super::FromSqliteRow;
use crate::validation::{check_catalog, Validate, ValidationErrors};

/// One logged meal. `entry_date` is a calendar date with no time component;
/// the by-date query matches it exactly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    pub id: String,
    pub user_id: String,
    pub plan_id: Option<String>,
    pub meal_type: String,
    pub name: String,
    pub calories: Option<i32>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub food_items: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for MealEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            plan_id: row.get("plan_id")?,
            meal_type: row.get("meal_type")?,
            name: row.get("name")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            food_items: optional_json_column(row, "food_items")?,
            image_url: row.get("image_url")?,
            entry_date: row.get("entry_date")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealEntry {
    pub user_id: String,
    #[serde(default)]
    pub plan_id: Option<String>,
    pub meal_type: String,
    pub name: String,
    #[serde(default)]
    pub calories: Option<i32>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
    #[serde(default)]
    pub food_items: Option<serde_json::Value>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub entry_date: NaiveDate,
}

impl Validate for CreateMealEntry {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.user_id.is_empty() {
            errors.add("userId", "is required");
        }
        check_catalog(&mut errors, "mealType", &self.meal_type, MEAL_TYPES);
        if self.name.trim().is_empty() {
            errors.add("name", "is required");
        }
        if matches!(self.calories, Some(c) if c < 0) {
            errors.add("calories", "must not be negative");
        }
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealEntry {
    pub plan_id: Option<String>,
    pub meal_type: Option<String>,
    pub name: Option<String>,
    pub calories: Option<i32>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub food_items: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub entry_date: Option<NaiveDate>,
}

impl Validate for UpdateMealEntry {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(meal_type) = &self.meal_type {
            check_catalog(&mut errors, "mealType", meal_type, MEAL_TYPES);
        }
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            errors.add("name", "must not be empty");
        }
        errors.into_result()
    }
}
