//! Planner - answers one travel query, conversationally or with an itinerary
//!
//! A query goes to the model together with the tool definitions. If the model
//! answers in prose, that prose is the reply. If it asks for a tool, the
//! dispatcher runs it and the first successful result becomes the reply.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};
use crate::prompts::PromptLoader;
use crate::tools::{ToolDispatcher, ToolOutcome, ToolRegistry};

/// Successful answer to a query
///
/// Serializes as `{"itinerary": ...}` or `{"response": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    Itinerary(Value),
    Response(String),
}

/// Reasons a query could not be answered
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A requested capability ran and failed
    #[error("{0}")]
    Capability(String),

    /// The model returned neither usable text nor a usable tool result
    #[error("Unexpected response format")]
    UnexpectedFormat,

    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("Failed to build prompt: {0}")]
    Prompt(String),
}

/// Routes a query through the model and, when asked, the tools
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    dispatcher: ToolDispatcher,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
}

impl Planner {
    /// Create a planner with the standard tool registry
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, config: &LlmConfig) -> Self {
        debug!(model = %config.model, "Planner::new: called");
        let registry = ToolRegistry::standard(llm.clone(), prompts.clone(), config.max_tokens);
        Self::with_registry(llm, prompts, registry, config.max_tokens)
    }

    /// Create a planner over an explicit registry
    pub fn with_registry(
        llm: Arc<dyn LlmClient>,
        prompts: Arc<PromptLoader>,
        registry: ToolRegistry,
        max_tokens: u32,
    ) -> Self {
        Self {
            llm,
            dispatcher: ToolDispatcher::new(registry),
            prompts,
            max_tokens,
        }
    }

    /// Answer a single, already-trimmed query
    pub async fn respond(&self, query: &str) -> Result<Reply, PlannerError> {
        debug!(%query, "Planner::respond: called");
        let system = self
            .prompts
            .system_prompt()
            .map_err(|e| PlannerError::Prompt(e.to_string()))?;

        let request = CompletionRequest {
            messages: vec![Message::system(system), Message::user(query)],
            tools: self.dispatcher.definitions(),
            max_tokens: self.max_tokens,
        };
        let response = self.llm.complete(request).await?;

        if response.has_tool_calls() {
            debug!(call_count = response.tool_calls.len(), "Planner::respond: model requested tools");
            let outcomes = self.dispatcher.dispatch(&response).await;
            return Self::select(outcomes);
        }

        // An empty string is still a text reply; only a missing one is unexpected
        match response.content {
            Some(text) => {
                info!(len = text.len(), "Conversational reply");
                Ok(Reply::Response(text))
            }
            None => {
                warn!("Model returned neither text nor tool calls");
                Err(PlannerError::UnexpectedFormat)
            }
        }
    }

    /// First result wins, then the first error; statuses alone are unexpected
    fn select(outcomes: Vec<ToolOutcome>) -> Result<Reply, PlannerError> {
        let mut first_error = None;
        for outcome in outcomes {
            match outcome {
                ToolOutcome::Success { tool, result, .. } => {
                    info!(%tool, "Tool reply");
                    return Ok(Reply::Itinerary(result));
                }
                ToolOutcome::Error { message, .. } if first_error.is_none() => {
                    first_error = Some(message);
                }
                other => {
                    debug!(outcome = %other.to_json(), "Planner::select: skipping outcome");
                }
            }
        }

        match first_error {
            Some(message) => Err(PlannerError::Capability(message)),
            None => {
                warn!("Tool calls produced no result and no error");
                Err(PlannerError::UnexpectedFormat)
            }
        }
    }
}
