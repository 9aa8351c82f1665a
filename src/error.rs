//! Client-facing error type and the single place error bodies are built.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, warn};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete client input.
    #[error("{message}")]
    BadRequest {
        message: String,
        detail: Option<Map<String, Value>>,
    },

    /// The id does not resolve to a record.
    #[error("{message}")]
    NotFound { message: String },

    /// A store operation failed. `diagnostic` goes to the logs only.
    #[error("{message}")]
    Internal {
        message: String,
        diagnostic: anyhow::Error,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            detail: None,
        }
    }

    pub fn bad_request_with(message: impl Into<String>, detail: Map<String, Value>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            detail: Some(detail),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>, diagnostic: anyhow::Error) -> Self {
        ApiError::Internal {
            message: message.into(),
            diagnostic,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body sent to the client: extra detail first, then `message` on top.
    pub fn to_body(&self) -> Value {
        let mut body = match self {
            ApiError::BadRequest {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => Map::new(),
        };
        body.insert("message".into(), Value::String(self.to_string()));
        Value::Object(body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Internal {
                message,
                diagnostic,
            } => error!(%status, error = ?diagnostic, reply = %message, "store operation failed"),
            _ => warn!(%status, reason = %self, "request rejected"),
        }
        (status, Json(self.to_body())).into_response()
    }
}
