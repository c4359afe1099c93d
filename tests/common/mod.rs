#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{header, Request};
use http_body_util::BodyExt;

use flexfit::ai::{AiError, ChatCompletion, ChatMessage, ChatOptions, PlanGenerator};
use flexfit::db::{create_memory_pool, DbPool};
use flexfit::handlers::{
    auth, generate, meal_entries, nutrition_plans, preferences, workout_logs, workouts,
};
use flexfit::migrations::run_migrations_for_tests;
use flexfit::models::{CreateUser, User};
use flexfit::repositories::{
    MealEntryRepository, NutritionPlanRepository, PreferencesRepository, UserRepository,
    WorkoutLogRepository, WorkoutRepository,
};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

/// Chat stand-in: serves a canned reply (or fails when none is set) and
/// counts invocations so tests can assert the model was never reached.
pub struct FakeChat {
    reply: Mutex<Option<String>>,
    calls: Mutex<usize>,
}

impl FakeChat {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Some(reply.to_string())),
            calls: Mutex::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(None),
            calls: Mutex::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ChatCompletion for FakeChat {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _options: ChatOptions,
    ) -> Result<String, AiError> {
        *self.calls.lock().unwrap() += 1;
        self.reply.lock().unwrap().clone().ok_or(AiError::Api {
            status: 429,
            message: "You exceeded your current quota".to_string(),
            code: Some("insufficient_quota".to_string()),
        })
    }
}

pub const WORKOUT_REPLY: &str = r#"{
    "title": "Beginner Full Body",
    "description": "A simple three day split",
    "duration": 45,
    "level": "Beginner",
    "type": "Strength",
    "exercises": [
        {"name": "Squat", "sets": 3, "reps": 10, "restTime": 90,
         "instructions": "Sit back and down, then drive up.", "tip": "Keep your knees tracking out."},
        {"name": "Bench Press", "sets": 3, "reps": 8, "restTime": 90,
         "instructions": "Lower the bar to mid-chest.", "tip": "Keep your feet planted."}
    ]
}"#;

pub const NUTRITION_REPLY: &str = r#"{
    "title": "Balanced Cut",
    "description": "High protein, moderate carb",
    "calorieTarget": 2000,
    "proteinTarget": 150,
    "carbTarget": 200,
    "fatTarget": 65,
    "recommendations": {
        "breakfast": [{"name": "Oatmeal", "calories": 320}],
        "lunch": [{"name": "Chicken bowl", "calories": 550}],
        "dinner": [{"name": "Salmon and rice", "calories": 600}],
        "snacks": [{"name": "Greek yogurt", "calories": 150}]
    }
}"#;

pub fn create_test_app(pool: DbPool) -> Router {
    create_test_app_with_chat(pool, FakeChat::replying(WORKOUT_REPLY))
}

pub fn create_test_app_with_chat(pool: DbPool, fake: Arc<FakeChat>) -> Router {
    let chat: Arc<dyn ChatCompletion> = fake;

    let user_repo = UserRepository::new(pool.clone());
    let preferences_repo = PreferencesRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let workout_log_repo = WorkoutLogRepository::new(pool.clone());
    let nutrition_repo = NutritionPlanRepository::new(pool.clone());
    let meal_entry_repo = MealEntryRepository::new(pool.clone());

    let generator = PlanGenerator::new(chat.clone(), workout_repo.clone(), nutrition_repo.clone());

    let auth_state = auth::AuthState {
        user_repo: user_repo.clone(),
    };
    let preferences_state = preferences::PreferencesState {
        user_repo: user_repo.clone(),
        preferences_repo,
    };
    let workouts_state = workouts::WorkoutsState {
        user_repo: user_repo.clone(),
        workout_repo: workout_repo.clone(),
    };
    let workout_logs_state = workout_logs::WorkoutLogsState {
        user_repo: user_repo.clone(),
        workout_repo: workout_repo.clone(),
        workout_log_repo,
    };
    let nutrition_plans_state = nutrition_plans::NutritionPlansState {
        user_repo: user_repo.clone(),
        nutrition_repo: nutrition_repo.clone(),
    };
    let meal_entries_state = meal_entries::MealEntriesState {
        user_repo: user_repo.clone(),
        nutrition_repo,
        meal_entry_repo,
    };
    let generate_state = generate::GenerateState {
        user_repo,
        generator,
        chat,
    };

    flexfit::routes::create_router(
        auth_state,
        preferences_state,
        workouts_state,
        workout_logs_state,
        nutrition_plans_state,
        meal_entries_state,
        generate_state,
    )
}

pub async fn create_test_user(pool: &DbPool, username: &str) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo
        .create(&CreateUser {
            username: username.to_string(),
            password: "password123".to_string(),
            first_name: "Test".to_string(),
            email: None,
            profile_image: None,
        })
        .await
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
