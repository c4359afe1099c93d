pub mod client;
pub mod generator;

pub use client::{AiError, ChatCompletion, ChatMessage, ChatOptions, OpenAiClient};
pub use generator::{GenerateNutritionPlanRequest, GenerateWorkoutRequest, PlanGenerator};
