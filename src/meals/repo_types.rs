use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use super::datetime::iso8601;

/// Meal record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: i64,                         // assigned by the store
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "iso8601")]
    pub meal_datetime: PrimitiveDateTime, // when the meal happened, client supplied
    pub is_on_diet: bool,
    #[serde(with = "iso8601")]
    pub created_at: PrimitiveDateTime,
    #[serde(with = "iso8601")]
    pub updated_at: PrimitiveDateTime,
}

/// Validated meal fields, ready to be inserted or written over an existing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeal {
    pub name: String,
    pub description: Option<String>,
    pub meal_datetime: PrimitiveDateTime,
    pub is_on_diet: bool,
}

impl std::fmt::Display for Meal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Meal {}: {} (on diet: {})>",
            self.id, self.name, self.is_on_diet
        )
    }
}
