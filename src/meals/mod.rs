pub mod datetime;
mod dto;
pub mod handlers;
#[cfg(test)]
pub(crate) mod memory;
pub mod repo;
pub mod repo_types;
mod services;
pub mod validation;

use crate::state::AppState;
use axum::Router;

pub use repo::{MealStore, PgMealStore};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::meal_routes())
}
