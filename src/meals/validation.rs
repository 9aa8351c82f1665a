//! Request payload checks for create and update.
//!
//! Checks run in a fixed order and the first failure wins:
//! body present, required keys present, `meal_datetime` parses, then the
//! text fields are well formed.

use serde_json::{Map, Value};

use super::datetime::parse_iso8601;
use super::repo_types::NewMeal;
use crate::error::{ApiError, ApiResult};

pub const REQUIRED_FIELDS: [&str; 3] = ["name", "meal_datetime", "is_on_diet"];

pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 255;

/// Turn raw body bytes into a JSON value. Empty bodies mean "no payload".
pub fn parse_body(raw: &[u8]) -> ApiResult<Option<Value>> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(raw)
        .map(Some)
        .map_err(|_| ApiError::bad_request("request body must be valid JSON"))
}

pub fn validate_meal(payload: Option<&Value>) -> ApiResult<NewMeal> {
    let data = match payload {
        Some(v) if is_truthy(v) => v,
        _ => return Err(ApiError::bad_request("request body must not be empty")),
    };
    let data = data
        .as_object()
        .ok_or_else(|| ApiError::bad_request("request body must be a JSON object"))?;

    check_required(data)?;

    let meal_datetime = data
        .get("meal_datetime")
        .and_then(Value::as_str)
        .and_then(parse_iso8601)
        .ok_or_else(|| {
            ApiError::bad_request(
                "invalid \"meal_datetime\" format, use ISO 8601 (YYYY-MM-DDTHH:MM:SS)",
            )
        })?;

    let name = check_name(&data["name"])?;
    let description = check_description(data.get("description"))?;
    let is_on_diet = is_truthy(&data["is_on_diet"]);

    Ok(NewMeal {
        name,
        description,
        meal_datetime,
        is_on_diet,
    })
}

fn check_required(data: &Map<String, Value>) -> ApiResult<()> {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !data.contains_key(*field))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let mut detail = Map::new();
    detail.insert(
        "missing_fields".into(),
        Value::Array(missing.iter().map(|f| Value::from(*f)).collect()),
    );
    Err(ApiError::bad_request_with(
        format!("missing required fields: {}", missing.join(", ")),
        detail,
    ))
}

fn check_name(value: &Value) -> ApiResult<String> {
    let name = value
        .as_str()
        .ok_or_else(|| ApiError::bad_request("\"name\" must be a string"))?;
    if name.trim().is_empty() {
        return Err(ApiError::bad_request("\"name\" must not be empty"));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(ApiError::bad_request(format!(
            "\"name\" must be at most {NAME_MAX_CHARS} characters"
        )));
    }
    Ok(name.to_owned())
}

fn check_description(value: Option<&Value>) -> ApiResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.chars().count() > DESCRIPTION_MAX_CHARS => {
            Err(ApiError::bad_request(format!(
                "\"description\" must be at most {DESCRIPTION_MAX_CHARS} characters"
            )))
        }
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ApiError::bad_request(
            "\"description\" must be a string or null",
        )),
    }
}

/// Truthiness of a JSON value: null, false, zero and empty containers are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
