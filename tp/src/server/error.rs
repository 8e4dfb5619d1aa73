//! HTTP error responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::planner::PlannerError;

/// Every failure the endpoint can report; the body is always `{"error": "<Display>"}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Service temporarily unavailable. Please configure GROQ_API_KEY environment variable.")]
    Unconfigured,

    #[error("No query provided")]
    NoQuery,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// A capability failed; its message is passed through verbatim
    #[error("{0}")]
    Capability(String),

    #[error("Unexpected response format")]
    UnexpectedFormat,

    #[error("System error: {0}")]
    System(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unconfigured => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NoQuery | ApiError::InvalidBody(_) | ApiError::Capability(_) => StatusCode::BAD_REQUEST,
            ApiError::UnexpectedFormat | ApiError::System(_) | ApiError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON body for this error
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.status();
        if code.is_server_error() {
            error!(status = %code, error = %self, "Request failed");
        } else {
            warn!(status = %code, error = %self, "Request rejected");
        }
        (code, Json(self.body())).into_response()
    }
}

impl From<PlannerError> for ApiError {
    fn from(e: PlannerError) -> Self {
        match e {
            PlannerError::Capability(message) => ApiError::Capability(message),
            PlannerError::UnexpectedFormat => ApiError::UnexpectedFormat,
            PlannerError::Llm(e) => ApiError::System(e.to_string()),
            PlannerError::Prompt(message) => ApiError::Unexpected(message),
        }
    }
}
