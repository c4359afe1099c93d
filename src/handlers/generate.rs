use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::ai::{
    AiError, ChatCompletion, ChatMessage, ChatOptions, GenerateNutritionPlanRequest,
    GenerateWorkoutRequest, PlanGenerator,
};
use crate::error::{AppError, Result};
use crate::repositories::UserRepository;
use crate::validation::parse_body;

#[derive(Clone)]
pub struct GenerateState {
    pub user_repo: UserRepository,
    pub generator: PlanGenerator,
    pub chat: Arc<dyn ChatCompletion>,
}

pub async fn generate_workout(
    State(state): State<GenerateState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    let request: GenerateWorkoutRequest = parse_body(body)
        .map_err(|e| AppError::validation("Invalid workout generation data", e))?;

    // An unknown user never reaches the model.
    if state.user_repo.find_by_id(&request.user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let workout = state.generator.generate_workout(&request).await?;
    Ok(Json(workout).into_response())
}

pub async fn generate_nutrition_plan(
    State(state): State<GenerateState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    let request: GenerateNutritionPlanRequest = parse_body(body)
        .map_err(|e| AppError::validation("Invalid nutrition plan generation data", e))?;

    if state.user_repo.find_by_id(&request.user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let plan = state.generator.generate_nutrition_plan(&request).await?;
    Ok(Json(plan).into_response())
}

/// Probe the configured key with a tiny completion. Always responds 200;
/// the body reports whether the key works.
pub async fn check_openai_key(State(state): State<GenerateState>) -> Response {
    let messages = [
        ChatMessage::system("You are a helpful assistant."),
        ChatMessage::user("Hello, is my API key working?"),
    ];
    let options = ChatOptions {
        max_tokens: Some(5),
        ..Default::default()
    };

    let body = match state.chat.complete(&messages, options).await {
        Ok(_) => json!({
            "valid": true,
            "message": "OpenAI API key is valid and working."
        }),
        Err(AiError::MissingApiKey) => json!({
            "valid": false,
            "message": "OpenAI API key is not set. Please add it to the environment variables."
        }),
        Err(e) if e.is_quota_exhausted() => json!({
            "valid": false,
            "quotaExceeded": true,
            "message": "Your OpenAI API key quota has been exceeded. Please update your OpenAI account or use a different API key."
        }),
        Err(e) => {
            tracing::error!("Error checking OpenAI API key: {}", e);
            json!({
                "valid": false,
                "message": "Error verifying OpenAI API key"
            })
        }
    };

    Json(body).into_response()
}
