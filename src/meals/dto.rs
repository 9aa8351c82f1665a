use serde::Serialize;

use super::repo_types::Meal;

pub const MEAL_CREATED: &str = "meal created successfully";
pub const MEAL_UPDATED: &str = "meal updated successfully";

/// Response for create and update.
#[derive(Debug, Serialize)]
pub struct MealWrittenResponse {
    pub message: String,
    pub meal: Meal,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub meal: Meal,
}

#[derive(Debug, Serialize)]
pub struct MealListResponse {
    pub meals: Vec<Meal>,
}
