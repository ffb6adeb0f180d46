//! Error types for the backend
//!
//! `ConfigError` covers startup configuration problems. `ApiError` is the
//! HTTP-facing error and renders as a JSON body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("malformed JSON body: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("JSON body must be an object or an array")]
    NotStrictJson,

    #[error("request body exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    BodyRead(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedJson(_) | ApiError::NotStrictJson | ApiError::BodyRead(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!("Rejecting request: {}", self);

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
