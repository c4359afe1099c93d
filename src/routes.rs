use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{
    auth, generate, health, meal_entries, nutrition_plans, options, preferences, workout_logs,
    workouts,
};

pub fn create_router(
    auth_state: auth::AuthState,
    preferences_state: preferences::PreferencesState,
    workouts_state: workouts::WorkoutsState,
    workout_logs_state: workout_logs::WorkoutLogsState,
    nutrition_plans_state: nutrition_plans::NutritionPlansState,
    meal_entries_state: meal_entries::MealEntriesState,
    generate_state: generate::GenerateState,
) -> Router {
    Router::new()
        // Auth routes (plus the stateless health/options endpoints)
        .route("/api/health", get(health::health_check))
        .route("/api/onboarding-options", get(options::onboarding_options))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .with_state(auth_state)
        // Preferences routes
        .route("/api/preferences", post(preferences::save))
        .route("/api/preferences/{user_id}", get(preferences::get_by_user))
        .with_state(preferences_state)
        // Workout routes
        .route("/api/workouts", post(workouts::create))
        .route("/api/workouts/user/{user_id}", get(workouts::list_by_user))
        .route("/api/workouts/{id}", get(workouts::get))
        .with_state(workouts_state)
        // Workout log routes
        .route("/api/workout-logs", post(workout_logs::create))
        .route(
            "/api/workout-logs/user/{user_id}",
            get(workout_logs::list_by_user),
        )
        .route("/api/workout-logs/{id}", patch(workout_logs::update))
        .with_state(workout_logs_state)
        // Nutrition plan routes
        .route("/api/nutrition-plans", post(nutrition_plans::create))
        .route(
            "/api/nutrition-plans/user/{user_id}",
            get(nutrition_plans::list_by_user),
        )
        .route(
            "/api/nutrition-plans/{id}",
            get(nutrition_plans::get).patch(nutrition_plans::update),
        )
        .with_state(nutrition_plans_state)
        // Meal entry routes
        .route("/api/meal-entries", post(meal_entries::create))
        .route(
            "/api/meal-entries/user/{user_id}/date/{date}",
            get(meal_entries::list_by_date),
        )
        .route(
            "/api/meal-entries/user/{user_id}",
            get(meal_entries::list_by_user),
        )
        .route(
            "/api/meal-entries/plan/{plan_id}",
            get(meal_entries::list_by_plan),
        )
        .route(
            "/api/meal-entries/{id}",
            get(meal_entries::get)
                .patch(meal_entries::update)
                .delete(meal_entries::delete),
        )
        .with_state(meal_entries_state)
        // Generation routes
        .route("/api/generate-workout", post(generate::generate_workout))
        .route(
            "/api/generate-nutrition-plan",
            post(generate::generate_nutrition_plan),
        )
        .route("/api/check-openai-key", get(generate::check_openai_key))
        .with_state(generate_state)
}
