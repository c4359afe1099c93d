use axum::Json;
use serde_json::json;

use crate::models::options::{
    DIET_TYPES, EQUIPMENT_OPTIONS, EXPERIENCE_LEVELS, FITNESS_GOALS, MEAL_TYPES,
};

/// Catalogs the mobile questionnaire renders as pickers.
pub async fn onboarding_options() -> Json<serde_json::Value> {
    Json(json!({
        "fitnessGoals": FITNESS_GOALS,
        "experienceLevels": EXPERIENCE_LEVELS,
        "equipmentOptions": EQUIPMENT_OPTIONS,
        "mealTypes": MEAL_TYPES,
        "dietTypes": DIET_TYPES,
    }))
}
