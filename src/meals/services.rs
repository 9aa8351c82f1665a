use serde_json::Value;
use time::{Duration, PrimitiveDateTime};
use tracing::info;

use super::datetime::utc_now;
use super::repo::MealStore;
use super::repo_types::Meal;
use super::validation::validate_meal;
use crate::error::{ApiError, ApiResult};

pub const MEAL_NOT_FOUND: &str = "meal not found";

pub async fn create_meal(store: &dyn MealStore, payload: Option<&Value>) -> ApiResult<Meal> {
    let fields = validate_meal(payload)?;
    let meal = store
        .insert(fields, utc_now())
        .await
        .map_err(|e| ApiError::internal("internal error while saving meal", e))?;
    info!(meal = %meal, "meal created");
    Ok(meal)
}

pub async fn list_meals(store: &dyn MealStore) -> ApiResult<Vec<Meal>> {
    store
        .list()
        .await
        .map_err(|e| ApiError::internal("internal error while loading meals", e))
}

pub async fn get_meal(store: &dyn MealStore, id: i64) -> ApiResult<Meal> {
    find_existing(store, id).await
}

/// Full replace. The id is resolved before the payload is looked at.
pub async fn update_meal(
    store: &dyn MealStore,
    id: i64,
    payload: Option<&Value>,
) -> ApiResult<Meal> {
    let current = find_existing(store, id).await?;
    let fields = validate_meal(payload)?;

    let updated_at = next_updated_at(current.updated_at, utc_now());
    let meal = store
        .update(id, fields, updated_at)
        .await
        .map_err(|e| ApiError::internal("internal error while saving meal", e))?
        // deleted by someone else between the lookup and the write
        .ok_or_else(|| ApiError::not_found(MEAL_NOT_FOUND))?;
    info!(meal = %meal, "meal updated");
    Ok(meal)
}

async fn find_existing(store: &dyn MealStore, id: i64) -> ApiResult<Meal> {
    store
        .find(id)
        .await
        .map_err(|e| ApiError::internal("internal error while loading meal", e))?
        .ok_or_else(|| ApiError::not_found(MEAL_NOT_FOUND))
}

/// `updated_at` must move strictly forward even if the clock did not.
fn next_updated_at(previous: PrimitiveDateTime, now: PrimitiveDateTime) -> PrimitiveDateTime {
    now.max(previous + Duration::microseconds(1))
}
