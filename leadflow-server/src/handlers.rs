//! API handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::AppState;

/// Request body for `POST /research`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Free-form natural-language lead request.
    pub query: String,
}

/// Runs the configured research backend for the query.
///
/// A failed run maps to a 500 with an error payload; there is no
/// partial-success response format.
pub async fn research(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> (StatusCode, Json<Value>) {
    match state.backend.research(&request.query).await {
        Ok(document) => (StatusCode::OK, Json(document)),
        Err(err) => {
            tracing::error!(error = %err, "research request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
        }
    }
}

/// Liveness probe.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") })),
    )
}
