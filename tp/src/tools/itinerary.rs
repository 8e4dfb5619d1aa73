//! Itinerary tool - structured multi-day trip generation

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::sanitize::{SanitizeError, sanitize_and_parse};
use crate::domain::{Itinerary, ItineraryError};
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, StopReason};
use crate::prompts::PromptLoader;

/// Message reported when the model returns no text at all
pub const EMPTY_RESPONSE: &str = "Empty response received from model.";

/// Result of one itinerary generation
///
/// Serializes as `{"itinerary": [...]}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItineraryOutcome {
    Itinerary(Itinerary),
    Error { error: String },
}

impl ItineraryOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        ItineraryOutcome::Error { error: message.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ItineraryOutcome::Error { .. })
    }
}

#[derive(Debug, Error)]
enum GenerateError {
    #[error("{0}")]
    Prompt(String),

    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("Empty response received from model.")]
    EmptyResponse,

    #[error("{0}")]
    Sanitize(#[from] SanitizeError),

    #[error("{0}")]
    Itinerary(#[from] ItineraryError),
}

/// Generates a structured multi-day itinerary with geographical data
pub struct ItineraryTool {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
}

impl ItineraryTool {
    /// Tool name (matches the function name the model calls)
    pub const NAME: &'static str = "generate_itinerary";

    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_tokens: u32) -> Self {
        debug!(%max_tokens, "ItineraryTool::new: called");
        Self {
            llm,
            prompts,
            max_tokens,
        }
    }

    pub fn description(&self) -> &'static str {
        "Generates a structured multi-day itinerary with geographical data for a given destination."
    }

    pub fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "destination": {
                    "type": "string",
                    "description": "Place or trek to plan, e.g. \"Pokhara\" or \"Annapurna Base Camp\""
                }
            },
            "required": ["destination"]
        })
    }

    /// Generate an itinerary; every failure is reported in the outcome
    pub async fn generate_itinerary(&self, destination: &str) -> ItineraryOutcome {
        debug!(%destination, "ItineraryTool::generate_itinerary: called");
        match self.try_generate(destination).await {
            Ok(itinerary) => {
                info!(%destination, days = itinerary.len(), "Itinerary generated");
                ItineraryOutcome::Itinerary(itinerary)
            }
            Err(e) => {
                warn!(%destination, error = %e, "Itinerary generation failed");
                ItineraryOutcome::error(e.to_string())
            }
        }
    }

    async fn try_generate(&self, destination: &str) -> Result<Itinerary, GenerateError> {
        let prompt = self
            .prompts
            .build_itinerary_prompt(destination)
            .map_err(|e| GenerateError::Prompt(e.to_string()))?;

        let request = CompletionRequest {
            messages: vec![Message::user(prompt)],
            tools: vec![],
            max_tokens: self.max_tokens,
        };
        let response = self.llm.complete(request).await?;
        if response.stop_reason == StopReason::MaxTokens {
            warn!(max_tokens = self.max_tokens, "Itinerary output hit the token limit and may be truncated");
        }

        let raw = response.content.unwrap_or_default();
        if raw.trim().is_empty() {
            return Err(GenerateError::EmptyResponse);
        }

        let value = sanitize_and_parse(&raw)?;
        Ok(Itinerary::from_value(value)?)
    }
}
