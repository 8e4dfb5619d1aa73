//! TripPlanner - LLM-backed travel assistant
//!
//! Answers a free-text travel query either conversationally or, when the
//! model decides the user wants a trip plan, with a structured multi-day
//! itinerary carrying elevation and coordinates for each day.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait and OpenAI-compatible (Groq) implementation
//! - [`prompts`] - Handlebars prompt templates, embedded or overridden
//! - [`domain`] - Itinerary document normalization
//! - [`tools`] - Capability registry, dispatcher and output sanitizing
//! - [`planner`] - One-query orchestration
//! - [`server`] - axum HTTP surface
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod server;
pub mod tools;

// Re-export commonly used types
pub use config::{Config, LlmConfig, ServerConfig};
pub use domain::{Coordinates, Itinerary, ItineraryError};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use planner::{Planner, PlannerError, Reply};
pub use prompts::PromptLoader;
pub use server::{ApiError, AppState, build_router};
pub use tools::{ItineraryOutcome, ItineraryTool, ToolDispatcher, ToolOutcome, ToolRegistry};
