use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::models::{CreateNutritionPlan, UpdateNutritionPlan};
use crate::repositories::{NutritionPlanRepository, UserRepository};
use crate::validation::parse_body;

#[derive(Clone)]
pub struct NutritionPlansState {
    pub user_repo: UserRepository,
    pub nutrition_repo: NutritionPlanRepository,
}

pub async fn create(
    State(state): State<NutritionPlansState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    let data: CreateNutritionPlan =
        parse_body(body).map_err(|e| AppError::validation("Invalid nutrition plan data", e))?;

    if state.user_repo.find_by_id(&data.user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let plan = state.nutrition_repo.create(&data).await?;
    Ok((StatusCode::CREATED, Json(plan)).into_response())
}

pub async fn get(
    State(state): State<NutritionPlansState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let plan = state
        .nutrition_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Nutrition plan not found".to_string()))?;
    Ok(Json(plan).into_response())
}

pub async fn list_by_user(
    State(state): State<NutritionPlansState>,
    Path(user_id): Path<String>,
) -> Result<Response> {
    let plans = state.nutrition_repo.find_by_user(&user_id).await?;
    Ok(Json(plans).into_response())
}

pub async fn update(
    State(state): State<NutritionPlansState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    let data: UpdateNutritionPlan = parse_body(body)
        .map_err(|e| AppError::validation("Invalid nutrition plan update data", e))?;

    let plan = state
        .nutrition_repo
        .update(&id, data)
        .await?
        .ok_or_else(|| AppError::NotFound("Nutrition plan not found".to_string()))?;
    Ok(Json(plan).into_response())
}
