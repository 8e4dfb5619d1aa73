//! Request handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::{ApiError, AppState};
use crate::planner::Reply;

/// `POST /generate-itinerary` with `{"query": "..."}`
pub async fn generate_itinerary(State(state): State<AppState>, body: Bytes) -> Result<Json<Reply>, ApiError> {
    debug!(body = %String::from_utf8_lossy(&body), "generate_itinerary: called");
    if !state.is_configured() {
        return Err(ApiError::Unconfigured);
    }

    let query = extract_query(&body)?;
    Ok(Json(answer(&state, &query).await?))
}

/// Answer a query outside of HTTP, with the same outcomes as the endpoint
pub async fn answer(state: &AppState, query: &str) -> Result<Reply, ApiError> {
    let Some(planner) = state.planner.as_ref() else {
        return Err(ApiError::Unconfigured);
    };
    let query = query.trim();
    if query.is_empty() {
        return Err(ApiError::NoQuery);
    }

    info!(%query, "Handling query");
    Ok(planner.respond(query).await?)
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "llm_configured": state.is_configured() }))
}

/// Pull the trimmed `query` string out of a JSON request body
pub fn extract_query(body: &[u8]) -> Result<String, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::NoQuery);
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    let query = value
        .get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    if query.is_empty() {
        return Err(ApiError::NoQuery);
    }
    Ok(query.to_string())
}
