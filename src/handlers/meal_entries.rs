use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::{CreateMealEntry, UpdateMealEntry};
use crate::repositories::{MealEntryRepository, NutritionPlanRepository, UserRepository};
use crate::validation::parse_body;

#[derive(Clone)]
pub struct MealEntriesState {
    pub user_repo: UserRepository,
    pub nutrition_repo: NutritionPlanRepository,
    pub meal_entry_repo: MealEntryRepository,
}

pub async fn create(
    State(state): State<MealEntriesState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    let data: CreateMealEntry =
        parse_body(body).map_err(|e| AppError::validation("Invalid meal entry data", e))?;

    if state.user_repo.find_by_id(&data.user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    if let Some(plan_id) = &data.plan_id {
        if state.nutrition_repo.find_by_id(plan_id).await?.is_none() {
            return Err(AppError::NotFound("Nutrition plan not found".to_string()));
        }
    }

    let entry = state.meal_entry_repo.create(&data).await?;
    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

pub async fn get(
    State(state): State<MealEntriesState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let entry = state
        .meal_entry_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Meal entry not found".to_string()))?;
    Ok(Json(entry).into_response())
}

pub async fn list_by_user(
    State(state): State<MealEntriesState>,
    Path(user_id): Path<String>,
) -> Result<Response> {
    let entries = state.meal_entry_repo.find_by_user(&user_id).await?;
    Ok(Json(entries).into_response())
}

pub async fn list_by_plan(
    State(state): State<MealEntriesState>,
    Path(plan_id): Path<String>,
) -> Result<Response> {
    let entries = state.meal_entry_repo.find_by_plan(&plan_id).await?;
    Ok(Json(entries).into_response())
}

pub async fn list_by_date(
    State(state): State<MealEntriesState>,
    Path((user_id, date)): Path<(String, String)>,
) -> Result<Response> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest("Invalid date format. Use YYYY-MM-DD".to_string())
    })?;

    let entries = state.meal_entry_repo.find_by_date(&user_id, date).await?;
    Ok(Json(entries).into_response())
}

pub async fn update(
    State(state): State<MealEntriesState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    let data: UpdateMealEntry =
        parse_body(body).map_err(|e| AppError::validation("Invalid meal entry update data", e))?;

    let entry = state
        .meal_entry_repo
        .update(&id, data)
        .await?
        .ok_or_else(|| AppError::NotFound("Meal entry not found".to_string()))?;
    Ok(Json(entry).into_response())
}

pub async fn delete(
    State(state): State<MealEntriesState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let removed = state.meal_entry_repo.delete(&id).await?;
    if !removed {
        return Err(AppError::NotFound("Meal entry not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT.into_response())
}
