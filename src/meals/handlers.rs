use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use tracing::instrument;

use super::dto::{MealListResponse, MealResponse, MealWrittenResponse, MEAL_CREATED, MEAL_UPDATED};
use super::services::{self, MEAL_NOT_FOUND};
use super::validation::parse_body;
use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/:id", get(get_meal).put(update_meal))
}

#[instrument(skip(state, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<MealWrittenResponse>)> {
    let payload = parse_body(&body)?;
    let meal = services::create_meal(state.store.as_ref(), payload.as_ref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(MealWrittenResponse {
            message: MEAL_CREATED.into(),
            meal,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_meals(State(state): State<AppState>) -> ApiResult<Json<MealListResponse>> {
    let meals = services::list_meals(state.store.as_ref()).await?;
    Ok(Json(MealListResponse { meals }))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MealResponse>> {
    let id = parse_meal_id(&id)?;
    let meal = services::get_meal(state.store.as_ref(), id).await?;
    Ok(Json(MealResponse { meal }))
}

#[instrument(skip(state, body))]
pub async fn update_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<MealWrittenResponse>> {
    let id = parse_meal_id(&id)?;
    // a malformed body must not hide a 404
    let payload = parse_body(&body);
    let meal = match payload {
        Ok(payload) => services::update_meal(state.store.as_ref(), id, payload.as_ref()).await?,
        Err(e) => {
            services::get_meal(state.store.as_ref(), id).await?;
            return Err(e);
        }
    };
    Ok(Json(MealWrittenResponse {
        message: MEAL_UPDATED.into(),
        meal,
    }))
}

/// Ids that are not integers cannot name a meal.
fn parse_meal_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::not_found(MEAL_NOT_FOUND))
}
