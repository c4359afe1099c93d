use std::sync::Arc;

use serde::Deserialize;

use super::client::{ChatCompletion, ChatMessage, ChatOptions};
use crate::error::{AppError, Result};
use crate::models::options::{DIET_TYPES, EXPERIENCE_LEVELS};
use crate::models::{CreateNutritionPlan, CreateWorkout, NutritionPlan, Workout};
use crate::repositories::{NutritionPlanRepository, WorkoutRepository};
use crate::validation::{check_catalog, Validate, ValidationErrors};

const WORKOUT_PERSONA: &str = "You are an expert fitness trainer specialized in creating \
personalized workout plans. Create workouts that are safe, effective, and tailored to the \
user's needs.";

const NUTRITION_PERSONA: &str = "You are an expert nutritionist specialized in creating \
personalized meal plans. Create nutrition plans that are healthy, balanced, and tailored \
to the user's needs.";

const WORKOUT_SCHEMA: &str = r#"Return a JSON object with the following structure:
{
  "title": "Workout title",
  "description": "Brief workout description",
  "duration": duration in minutes,
  "level": "Beginner/Intermediate/Advanced",
  "type": "Strength/Cardio/HIIT/etc",
  "exercises": [
    {
      "name": "Exercise name",
      "sets": number of sets,
      "reps": number of reps,
      "restTime": rest time in seconds,
      "instructions": "Step-by-step instructions",
      "tip": "A helpful tip for proper form"
    }
  ]
}"#;

const NUTRITION_SCHEMA: &str = r#"Return a JSON object with the following structure:
{
  "title": "Nutrition plan title",
  "description": "Brief nutrition plan description",
  "calorieTarget": target daily calories,
  "proteinTarget": target daily protein in grams,
  "carbTarget": target daily carbohydrates in grams,
  "fatTarget": target daily fat in grams,
  "recommendations": {
    "breakfast": [{"name": "Meal name", "description": "Brief description", "calories": estimated calories, "protein": protein in grams, "carbs": carbs in grams, "fat": fat in grams, "ingredients": ["ingredient 1", "ingredient 2"]}],
    "lunch": [...],
    "dinner": [...],
    "snacks": [...]
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateWorkoutRequest {
    pub user_id: String,
    pub goals: Vec<String>,
    pub experience_level: String,
    pub available_equipment: String,
    #[serde(default)]
    pub workout_duration: Option<i32>,
    #[serde(default)]
    pub focus_areas: Option<Vec<String>>,
}

impl Validate for GenerateWorkoutRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.user_id.is_empty() {
            errors.add("userId", "is required");
        }
        if self.goals.is_empty() {
            errors.add("goals", "must contain at least one goal");
        }
        check_catalog(
            &mut errors,
            "experienceLevel",
            &self.experience_level,
            EXPERIENCE_LEVELS,
        );
        if self.available_equipment.trim().is_empty() {
            errors.add("availableEquipment", "is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateNutritionPlanRequest {
    pub user_id: String,
    pub goals: Vec<String>,
    pub diet_type: String,
    #[serde(default)]
    pub calorie_target: Option<i32>,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    #[serde(default)]
    pub preferred_foods: Option<Vec<String>>,
}

impl Validate for GenerateNutritionPlanRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.user_id.is_empty() {
            errors.add("userId", "is required");
        }
        if self.goals.is_empty() {
            errors.add("goals", "must contain at least one goal");
        }
        check_catalog(&mut errors, "dietType", &self.diet_type, DIET_TYPES);
        errors.into_result()
    }
}

/// The JSON shape the model is asked to produce for workouts. Unknown
/// fields are ignored; a missing title or exercise list is a parse failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedWorkout {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    duration: Option<i32>,
    #[serde(default)]
    level: Option<String>,
    #[serde(default, rename = "type")]
    workout_type: Option<String>,
    exercises: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedNutritionPlan {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    calorie_target: Option<i32>,
    #[serde(default)]
    protein_target: Option<i32>,
    #[serde(default)]
    carb_target: Option<i32>,
    #[serde(default)]
    fat_target: Option<i32>,
    recommendations: serde_json::Value,
}

/// Turns a validated generation request into a persisted record: compose the
/// instruction, call the model, parse its JSON, persist. Nothing is written
/// unless parsing succeeds.
#[derive(Clone)]
pub struct PlanGenerator {
    chat: Arc<dyn ChatCompletion>,
    workout_repo: WorkoutRepository,
    nutrition_repo: NutritionPlanRepository,
}

impl PlanGenerator {
    pub fn new(
        chat: Arc<dyn ChatCompletion>,
        workout_repo: WorkoutRepository,
        nutrition_repo: NutritionPlanRepository,
    ) -> Self {
        Self {
            chat,
            workout_repo,
            nutrition_repo,
        }
    }

    pub async fn generate_workout(&self, request: &GenerateWorkoutRequest) -> Result<Workout> {
        let messages = [
            ChatMessage::system(WORKOUT_PERSONA),
            ChatMessage::user(workout_prompt(request)),
        ];
        let content = self
            .chat
            .complete(
                &messages,
                ChatOptions {
                    json_object: true,
                    ..Default::default()
                },
            )
            .await?;

        let plan: GeneratedWorkout =
            serde_json::from_str(&content).map_err(|e| AppError::MalformedPlan(e.to_string()))?;
        if !plan.exercises.is_array() {
            return Err(AppError::MalformedPlan(
                "exercises is not an array".to_string(),
            ));
        }

        self.workout_repo
            .create(&CreateWorkout {
                user_id: request.user_id.clone(),
                title: plan.title,
                description: plan.description,
                duration: plan.duration,
                level: plan.level,
                workout_type: plan.workout_type,
                image_url: None,
                exercises: plan.exercises,
                ai_generated: Some(true),
            })
            .await
    }

    pub async fn generate_nutrition_plan(
        &self,
        request: &GenerateNutritionPlanRequest,
    ) -> Result<NutritionPlan> {
        let messages = [
            ChatMessage::system(NUTRITION_PERSONA),
            ChatMessage::user(nutrition_prompt(request)),
        ];
        let content = self
            .chat
            .complete(
                &messages,
                ChatOptions {
                    json_object: true,
                    ..Default::default()
                },
            )
            .await?;

        let plan: GeneratedNutritionPlan =
            serde_json::from_str(&content).map_err(|e| AppError::MalformedPlan(e.to_string()))?;

        self.nutrition_repo
            .create(&CreateNutritionPlan {
                user_id: request.user_id.clone(),
                title: plan.title,
                description: plan.description,
                calorie_target: plan.calorie_target,
                protein_target: plan.protein_target,
                carb_target: plan.carb_target,
                fat_target: plan.fat_target,
                recommendations: plan.recommendations,
                ai_generated: Some(true),
            })
            .await
    }
}

/// Parameters the caller did not supply contribute no line at all.
pub fn workout_prompt(request: &GenerateWorkoutRequest) -> String {
    let mut lines = vec![
        "Create a workout plan with the following parameters:".to_string(),
        format!("- Goals: {}", request.goals.join(", ")),
        format!("- Experience level: {}", request.experience_level),
        format!("- Available equipment: {}", request.available_equipment),
    ];
    if let Some(duration) = request.workout_duration {
        lines.push(format!("- Workout duration: {} minutes", duration));
    }
    if let Some(areas) = &request.focus_areas {
        if !areas.is_empty() {
            lines.push(format!("- Focus areas: {}", areas.join(", ")));
        }
    }
    format!("{}\n\n{}", lines.join("\n"), WORKOUT_SCHEMA)
}

pub fn nutrition_prompt(request: &GenerateNutritionPlanRequest) -> String {
    let mut lines = vec![
        "Create a nutrition plan with the following parameters:".to_string(),
        format!("- Goals: {}", request.goals.join(", ")),
        format!("- Diet type: {}", request.diet_type),
    ];
    if let Some(calories) = request.calorie_target {
        lines.push(format!("- Calorie target: {} calories per day", calories));
    }
    if let Some(allergies) = &request.allergies {
        if !allergies.is_empty() {
            lines.push(format!("- Allergies: {}", allergies.join(", ")));
        }
    }
    if let Some(foods) = &request.preferred_foods {
        if !foods.is_empty() {
            lines.push(format!("- Preferred foods: {}", foods.join(", ")));
        }
    }
    format!("{}\n\n{}", lines.join("\n"), NUTRITION_SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::AiError;
    use crate::db::{create_memory_pool, DbPool};
    use crate::migrations::run_migrations_for_tests;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeChat {
        reply: Option<String>,
        calls: Mutex<usize>,
    }

    impl FakeChat {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatCompletion for FakeChat {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _options: ChatOptions,
        ) -> std::result::Result<String, AiError> {
            *self.calls.lock().unwrap() += 1;
            self.reply.clone().ok_or(AiError::EmptyResponse)
        }
    }

    fn setup_test_db() -> DbPool {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        pool
    }

    fn create_test_user(pool: &DbPool, user_id: &str) {
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO users (id, username, password_hash, first_name, created_at)
             VALUES (?, ?, 'hash', 'Test', datetime('now'))",
            rusqlite::params![user_id, format!("user_{}", user_id)],
        )
        .unwrap();
    }

    fn workout_request(user_id: &str) -> GenerateWorkoutRequest {
        GenerateWorkoutRequest {
            user_id: user_id.to_string(),
            goals: vec!["Build Muscle".to_string()],
            experience_level: "Beginner".to_string(),
            available_equipment: "Full Gym Access".to_string(),
            workout_duration: None,
            focus_areas: None,
        }
    }

    fn generator(pool: &DbPool, chat: FakeChat) -> PlanGenerator {
        PlanGenerator::new(
            Arc::new(chat),
            WorkoutRepository::new(pool.clone()),
            NutritionPlanRepository::new(pool.clone()),
        )
    }

    #[test]
    fn test_workout_prompt_omits_absent_optionals() {
        let prompt = workout_prompt(&workout_request("u1"));
        assert!(prompt.contains("- Goals: Build Muscle"));
        assert!(prompt.contains("- Experience level: Beginner"));
        assert!(!prompt.contains("Workout duration"));
        assert!(!prompt.contains("Focus areas"));
    }

    #[test]
    fn test_workout_prompt_includes_supplied_optionals() {
        let mut request = workout_request("u1");
        request.workout_duration = Some(30);
        request.focus_areas = Some(vec!["Arms".to_string(), "Back".to_string()]);
        let prompt = workout_prompt(&request);
        assert!(prompt.contains("- Workout duration: 30 minutes"));
        assert!(prompt.contains("- Focus areas: Arms, Back"));
    }

    #[test]
    fn test_nutrition_prompt_omits_empty_lists() {
        let request = GenerateNutritionPlanRequest {
            user_id: "u1".to_string(),
            goals: vec!["Lose Weight".to_string()],
            diet_type: "Vegetarian".to_string(),
            calorie_target: None,
            allergies: Some(vec![]),
            preferred_foods: None,
        };
        let prompt = nutrition_prompt(&request);
        assert!(prompt.contains("- Diet type: Vegetarian"));
        assert!(!prompt.contains("Allergies"));
        assert!(!prompt.contains("Preferred foods"));
        assert!(!prompt.contains("Calorie target"));
    }

    #[tokio::test]
    async fn test_generate_workout_persists_parsed_plan() {
        let pool = setup_test_db();
        create_test_user(&pool, "u1");
        let chat = FakeChat::replying(
            r#"{"title": "Beginner Full Body", "description": "Three day split",
                "duration": 45, "level": "Beginner", "type": "Strength",
                "exercises": [{"name": "Squat", "sets": 3, "reps": 10, "restTime": 90,
                               "instructions": "Sit back and down.", "tip": "Knees out."}]}"#,
        );
        let generator = generator(&pool, chat);

        let workout = generator
            .generate_workout(&workout_request("u1"))
            .await
            .unwrap();

        assert!(workout.ai_generated);
        assert_eq!(workout.title, "Beginner Full Body");
        assert_eq!(workout.exercises.as_array().unwrap().len(), 1);

        let stored = WorkoutRepository::new(pool)
            .find_by_id(&workout.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.exercises, workout.exercises);
    }

    #[tokio::test]
    async fn test_unparsable_reply_persists_nothing() {
        let pool = setup_test_db();
        create_test_user(&pool, "u1");
        let chat = FakeChat::replying("sorry, I can only answer in prose");
        let generator = generator(&pool, chat);

        let result = generator.generate_workout(&workout_request("u1")).await;
        assert!(matches!(result, Err(AppError::MalformedPlan(_))));

        let workouts = WorkoutRepository::new(pool).find_by_user("u1").await.unwrap();
        assert!(workouts.is_empty());
    }

    #[tokio::test]
    async fn test_non_array_exercises_is_malformed() {
        let pool = setup_test_db();
        create_test_user(&pool, "u1");
        let chat = FakeChat::replying(r#"{"title": "Plan", "exercises": {"name": "Squat"}}"#);
        let generator = generator(&pool, chat);

        let result = generator.generate_workout(&workout_request("u1")).await;
        assert!(matches!(result, Err(AppError::MalformedPlan(_))));
    }

    #[tokio::test]
    async fn test_generate_nutrition_plan_persists_parsed_plan() {
        let pool = setup_test_db();
        create_test_user(&pool, "u1");
        let chat = FakeChat::replying(
            r#"{"title": "Vegetarian Cut", "calorieTarget": 1900, "proteinTarget": 140,
                "carbTarget": 180, "fatTarget": 60,
                "recommendations": {"breakfast": [], "lunch": [], "dinner": [], "snacks": []}}"#,
        );
        let generator = generator(&pool, chat);

        let request = GenerateNutritionPlanRequest {
            user_id: "u1".to_string(),
            goals: vec!["Lose Weight".to_string()],
            diet_type: "Vegetarian".to_string(),
            calorie_target: Some(1900),
            allergies: None,
            preferred_foods: None,
        };
        let plan = generator.generate_nutrition_plan(&request).await.unwrap();

        assert!(plan.ai_generated);
        assert_eq!(plan.calorie_target, Some(1900));

        let stored = NutritionPlanRepository::new(pool)
            .find_by_id(&plan.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, "Vegetarian Cut");
    }
}
