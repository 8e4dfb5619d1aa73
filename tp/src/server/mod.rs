//! HTTP surface
//!
//! One endpoint, `POST /generate-itinerary`, plus `GET /health`. The planner
//! is optional: without model credentials the server still starts and
//! answers 503.

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

mod error;
mod handler;

pub use error::ApiError;
pub use handler::{answer, extract_query};

use crate::config::ServerConfig;
use crate::planner::Planner;

/// Shared, read-only request state
#[derive(Clone)]
pub struct AppState {
    pub planner: Option<Arc<Planner>>,
}

impl AppState {
    /// State for a server with no model configured
    pub fn unconfigured() -> Self {
        Self { planner: None }
    }

    pub fn configured(planner: Arc<Planner>) -> Self {
        Self { planner: Some(planner) }
    }

    pub fn is_configured(&self) -> bool {
        self.planner.is_some()
    }
}

/// Build the router with CORS, request tracing and panic recovery
pub fn build_router(state: AppState) -> Router {
    debug!(configured = state.is_configured(), "build_router: called");
    Router::new()
        .route("/generate-itinerary", post(handler::generate_itinerary))
        .route("/health", get(handler::health))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Unexpected(message).into_response()
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    if !state.is_configured() {
        warn!("Serving without an LLM; itinerary requests will answer 503");
    }
    info!("Listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::{CompletionResponse, ToolCall};
    use crate::prompts::PromptLoader;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(responses: Vec<CompletionResponse>) -> Router {
        let llm = Arc::new(MockLlmClient::new(responses));
        let prompts = Arc::new(PromptLoader::embedded_only().unwrap());
        let planner = Planner::new(llm, prompts, &LlmConfig::default());
        build_router(AppState::configured(Arc::new(planner)))
    }

    fn post_query(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/generate-itinerary")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_is_503_before_body_checks() {
        let app = build_router(AppState::unconfigured());
        let response = app.oneshot(post_query("")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Service temporarily unavailable. Please configure GROQ_API_KEY environment variable."})
        );
    }

    #[tokio::test]
    async fn test_blank_query_is_400_without_model_call() {
        let response = app(vec![])
            .oneshot(post_query(r#"{"query": "   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "No query provided"}));
    }

    #[tokio::test]
    async fn test_conversational_200() {
        let response = app(vec![CompletionResponse::text("Spring and autumn are best.")])
            .oneshot(post_query(r#"{"query": "When should I visit Nepal?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"response": "Spring and autumn are best."}));
    }

    #[tokio::test]
    async fn test_capability_failure_is_400() {
        let response = app(vec![
            CompletionResponse::with_tool_calls(vec![ToolCall::new(
                "c1",
                "generate_itinerary",
                r#"{"destination": "Pokhara"}"#,
            )]),
            CompletionResponse::text(""),
        ])
        .oneshot(post_query(r#"{"query": "Plan Pokhara"}"#))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Empty response received from model."}));
    }

    #[tokio::test]
    async fn test_llm_failure_is_system_error() {
        let response = app(vec![])
            .oneshot(post_query(r#"{"query": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("System error: "));
    }

    #[tokio::test]
    async fn test_health_reports_configuration() {
        let request = || Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = build_router(AppState::unconfigured()).oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok", "llm_configured": false}));

        let response = app(vec![]).oneshot(request()).await.unwrap();
        assert_eq!(body_json(response).await["llm_configured"], true);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/generate-itinerary")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app(vec![]).oneshot(request).await.unwrap();
        let allow_origin = response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap();
        assert_eq!(allow_origin.to_str().unwrap(), "*");
    }

    #[tokio::test]
    async fn test_panic_maps_to_unexpected_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"error": "Unexpected error: boom"}));
    }
}
