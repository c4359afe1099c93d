use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::models::{CreateWorkoutLog, UpdateWorkoutLog};
use crate::repositories::{UserRepository, WorkoutLogRepository, WorkoutRepository};
use crate::validation::parse_body;

#[derive(Clone)]
pub struct WorkoutLogsState {
    pub user_repo: UserRepository,
    pub workout_repo: WorkoutRepository,
    pub workout_log_repo: WorkoutLogRepository,
}

pub async fn create(
    State(state): State<WorkoutLogsState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    let data: CreateWorkoutLog =
        parse_body(body).map_err(|e| AppError::validation("Invalid workout log data", e))?;

    if state.user_repo.find_by_id(&data.user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    if state
        .workout_repo
        .find_by_id(&data.workout_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }

    let log = state.workout_log_repo.create(&data).await?;
    Ok((StatusCode::CREATED, Json(log)).into_response())
}

pub async fn update(
    State(state): State<WorkoutLogsState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    let data: UpdateWorkoutLog =
        parse_body(body).map_err(|e| AppError::validation("Invalid workout log update data", e))?;

    let log = state
        .workout_log_repo
        .update(&id, data)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout log not found".to_string()))?;
    Ok(Json(log).into_response())
}

pub async fn list_by_user(
    State(state): State<WorkoutLogsState>,
    Path(user_id): Path<String>,
) -> Result<Response> {
    let logs = state.workout_log_repo.find_by_user(&user_id).await?;
    Ok(Json(logs).into_response())
}
