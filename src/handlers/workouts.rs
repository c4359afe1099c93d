use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::models::CreateWorkout;
use crate::repositories::{UserRepository, WorkoutRepository};
use crate::validation::parse_body;

#[derive(Clone)]
pub struct WorkoutsState {
    pub user_repo: UserRepository,
    pub workout_repo: WorkoutRepository,
}

pub async fn create(
    State(state): State<WorkoutsState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    let data: CreateWorkout =
        parse_body(body).map_err(|e| AppError::validation("Invalid workout data", e))?;

    if state.user_repo.find_by_id(&data.user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let workout = state.workout_repo.create(&data).await?;
    Ok((StatusCode::CREATED, Json(workout)).into_response())
}

pub async fn get(
    State(state): State<WorkoutsState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let workout = state
        .workout_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;
    Ok(Json(workout).into_response())
}

pub async fn list_by_user(
    State(state): State<WorkoutsState>,
    Path(user_id): Path<String>,
) -> Result<Response> {
    let workouts = state.workout_repo.find_by_user(&user_id).await?;
    Ok(Json(workouts).into_response())
}
