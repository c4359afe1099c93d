pub mod from_row;
pub mod meal_entry;
pub mod nutrition_plan;
pub mod options;
pub mod preferences;
pub mod user;
pub mod workout;
pub mod workout_log;

pub use from_row::FromSqliteRow;
pub use meal_entry::{CreateMealEntry, MealEntry, UpdateMealEntry};
pub use nutrition_plan::{CreateNutritionPlan, NutritionPlan, UpdateNutritionPlan};
pub use preferences::{CreatePreferences, UpdatePreferences, UserPreferences};
pub use user::{CreateUser, User};
pub use workout::{CreateWorkout, UpdateWorkout, Workout};
pub use workout_log::{CreateWorkoutLog, UpdateWorkoutLog, WorkoutLog};
