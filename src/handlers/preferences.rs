use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::models::{CreatePreferences, UpdatePreferences};
use crate::repositories::{PreferencesRepository, UserRepository};
use crate::validation::parse_body;

#[derive(Clone)]
pub struct PreferencesState {
    pub user_repo: UserRepository,
    pub preferences_repo: PreferencesRepository,
}

/// Upsert by user: a resubmission updates the existing row instead of
/// creating a second one.
pub async fn save(
    State(state): State<PreferencesState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    let data: CreatePreferences =
        parse_body(body).map_err(|e| AppError::validation("Invalid preferences data", e))?;

    if state.user_repo.find_by_id(&data.user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    if let Some(existing) = state.preferences_repo.find_by_user(&data.user_id).await? {
        let updated = state
            .preferences_repo
            .update(&existing.id, UpdatePreferences::from(data))
            .await?
            .ok_or_else(|| AppError::NotFound("Preferences not found".to_string()))?;
        return Ok(Json(updated).into_response());
    }

    let preferences = state.preferences_repo.create(&data).await?;
    Ok((StatusCode::CREATED, Json(preferences)).into_response())
}

pub async fn get_by_user(
    State(state): State<PreferencesState>,
    Path(user_id): Path<String>,
) -> Result<Response> {
    let preferences = state
        .preferences_repo
        .find_by_user(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Preferences not found".to_string()))?;
    Ok(Json(preferences).into_response())
}
