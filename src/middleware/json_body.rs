//! JSON Body Middleware
//!
//! Eagerly buffers and parses JSON request bodies before they reach a route.
//! The parsed value is attached as a [`JsonBody`] request extension and the
//! raw bytes are put back so downstream extractors still see the body.

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use serde_json::Value;

use crate::error::ApiError;

/// Parsed JSON request body. Empty bodies parse to an empty object.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

/// Maximum body size accepted by [`parse_json_body`]
#[derive(Debug, Clone, Copy)]
pub struct JsonBodyLimit(pub usize);

/// Whether a `Content-Type` value denotes JSON (`application/json` or a
/// `+json` suffix type), ignoring parameters such as `charset`.
pub fn is_json_content_type(value: &str) -> bool {
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json"
        || mime
            .split_once('/')
            .is_some_and(|(_, subtype)| subtype.ends_with("+json"))
}

pub async fn parse_json_body(
    State(JsonBodyLimit(limit)): State<JsonBodyLimit>,
    req: Request,
    next: Next,
) -> Response {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(is_json_content_type);

    if !is_json {
        return next.run(req).await;
    }

    let declared_len = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared_len.is_some_and(|len| len > limit) {
        return ApiError::PayloadTooLarge { limit }.into_response();
    }

    let (mut parts, body) = req.into_parts();
    let bytes = match to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) if exceeded_limit(&e) => {
            return ApiError::PayloadTooLarge { limit }.into_response();
        }
        Err(e) => {
            tracing::debug!("[JsonBody] Failed to buffer request body: {}", e);
            return ApiError::BodyRead(e.to_string()).into_response();
        }
    };

    let value = match decode(&bytes) {
        Ok(value) => value,
        Err(e) => return e.into_response(),
    };
    tracing::debug!("[JsonBody] Parsed {} byte body for {}", bytes.len(), parts.uri);

    parts.extensions.insert(JsonBody(value));
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Whether buffering stopped because the body outgrew the limit, as opposed
/// to the client going away or the body stream failing.
fn exceeded_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

/// Strict decoding: only objects and arrays are accepted at the top level.
fn decode(bytes: &[u8]) -> Result<Value, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    match serde_json::from_slice::<Value>(bytes)? {
        value @ (Value::Object(_) | Value::Array(_)) => Ok(value),
        _ => Err(ApiError::NotStrictJson),
    }
}
