use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flexfit::ai::{ChatCompletion, OpenAiClient, PlanGenerator};
use flexfit::config::Config;
use flexfit::handlers::{
    auth, generate, meal_entries, nutrition_plans, preferences, workout_logs, workouts,
};
use flexfit::repositories::{
    MealEntryRepository, NutritionPlanRepository, PreferencesRepository, UserRepository,
    WorkoutLogRepository, WorkoutRepository,
};
use flexfit::{db, migrations, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flexfit=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    if config.openai_api_key.is_none() {
        tracing::warn!(
            "OPENAI_API_KEY environment variable is not set. Plan generation will not work."
        );
    }

    tracing::info!("Connecting to database: {}", config.database_url);

    // Create database pool
    let pool = db::create_pool(&config.database_url)?;

    // Run migrations
    migrations::run_migrations(&pool)?;

    // External model client, injected wherever generation happens
    let chat: Arc<dyn ChatCompletion> = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
    ));

    // Create repositories
    let user_repo = UserRepository::new(pool.clone());
    let preferences_repo = PreferencesRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let workout_log_repo = WorkoutLogRepository::new(pool.clone());
    let nutrition_repo = NutritionPlanRepository::new(pool.clone());
    let meal_entry_repo = MealEntryRepository::new(pool.clone());

    let generator = PlanGenerator::new(
        chat.clone(),
        workout_repo.clone(),
        nutrition_repo.clone(),
    );

    // Create handler states
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

    // Build router
    let app = routes::create_router(
        auth_state,
        preferences_state,
        workouts_state,
        workout_logs_state,
        nutrition_plans_state,
        meal_entries_state,
        generate_state,
    );

    // Start server
    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
