use axum::{extract::State, response::Json};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::server::AppState;

/// Body returned by the liveness probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub ok: bool,
    /// ISO-8601 UTC timestamp with millisecond precision, e.g.
    /// `2024-05-01T12:00:00.000Z`
    pub time: String,
}

impl PingResponse {
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            ok: true,
            time: time.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Liveness endpoint handler.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/api/ping`
/// - **Response**: `{"ok":true,"time":"2024-05-01T12:00:00.000Z"}`
///
/// Request body and query string are ignored. The handler touches no I/O and
/// cannot fail; `time` never decreases between calls.
///
/// ```bash
/// curl http://localhost:4000/api/ping
/// ```
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse::at(state.clock.now()))
}
