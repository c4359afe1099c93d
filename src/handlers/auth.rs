use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::CreateUser;
use crate::repositories::UserRepository;
use crate::validation::parse_body;

#[derive(Clone)]
pub struct AuthState {
    pub user_repo: UserRepository,
}

pub async fn register(
    State(state): State<AuthState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    let data: CreateUser =
        parse_body(body).map_err(|e| AppError::validation("Invalid user data", e))?;

    if state
        .user_repo
        .find_by_username(&data.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let user = state.user_repo.create(&data).await?;
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

pub async fn login(
    State(state): State<AuthState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    let username = body.get("username").and_then(|v| v.as_str()).unwrap_or("");
    let password = body.get("password").and_then(|v| v.as_str()).unwrap_or("");
    if username.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let user = state
        .user_repo
        .verify_password(username, password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(json!({ "user": user })).into_response())
}
