//! Option catalogs served to the onboarding questionnaire.

pub const FITNESS_GOALS: &[&str] = &[
    "Build Muscle",
    "Lose Weight",
    "Improve Endurance",
    "Increase Flexibility",
    "Improve Strength",
    "Stress Relief",
    "Better Posture",
    "Rehabilitation",
];

pub const EXPERIENCE_LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced"];

pub const EQUIPMENT_OPTIONS: &[&str] = &[
    "No Equipment (Bodyweight only)",
    "Basic Equipment (Dumbbells, Resistance Bands)",
    "Full Gym Access",
];

pub const MEAL_TYPES: &[&str] = &["Breakfast", "Lunch", "Dinner", "Snack"];

pub const DIET_TYPES: &[&str] = &[
    "Regular",
    "Vegetarian",
    "Vegan",
    "Keto",
    "Paleo",
    "Mediterranean",
    "Low-Carb",
    "Low-Fat",
];
