//! ToolDispatcher - executes the tool calls a model response requests

use serde_json::{Value, json};
use tracing::{debug, warn};

use super::ToolRegistry;
use crate::llm::{CompletionResponse, ToolCall, ToolDefinition};

/// Outcome of one requested tool invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// The response requested no tools at all
    NoToolCalls,
    Success {
        tool: String,
        arguments: Value,
        result: Value,
    },
    NotFound {
        tool: String,
    },
    InvalidArguments {
        tool: String,
    },
    Error {
        tool: String,
        message: String,
    },
}

impl ToolOutcome {
    pub fn result(&self) -> Option<&Value> {
        match self {
            ToolOutcome::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ToolOutcome::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Status label for outcomes that carry neither a result nor an error
    pub fn status(&self) -> Option<&'static str> {
        match self {
            ToolOutcome::NoToolCalls => Some("no_tool_calls"),
            ToolOutcome::NotFound { .. } => Some("not_found"),
            ToolOutcome::InvalidArguments { .. } => Some("invalid_arguments"),
            ToolOutcome::Success { .. } | ToolOutcome::Error { .. } => None,
        }
    }

    pub fn tool(&self) -> Option<&str> {
        match self {
            ToolOutcome::NoToolCalls => None,
            ToolOutcome::Success { tool, .. }
            | ToolOutcome::NotFound { tool }
            | ToolOutcome::InvalidArguments { tool }
            | ToolOutcome::Error { tool, .. } => Some(tool),
        }
    }

    /// Wire form: exactly one of `result`, `error`, `status`, plus `tool` when known
    pub fn to_json(&self) -> Value {
        match self {
            ToolOutcome::NoToolCalls => json!({"status": "no_tool_calls"}),
            ToolOutcome::Success {
                tool,
                arguments,
                result,
            } => json!({"tool": tool, "arguments": arguments, "result": result}),
            ToolOutcome::NotFound { tool } => json!({"tool": tool, "status": "not_found"}),
            ToolOutcome::InvalidArguments { tool } => json!({"tool": tool, "status": "invalid_arguments"}),
            ToolOutcome::Error { tool, message } => json!({"tool": tool, "error": message}),
        }
    }
}

/// Resolves and runs tool calls against a registry
pub struct ToolDispatcher {
    registry: ToolRegistry,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        debug!(tools = ?registry.tool_names(), "ToolDispatcher::new: called");
        Self { registry }
    }

    /// Tool definitions to advertise to the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    /// Run every tool call in `response`, in the order the model proposed them
    pub async fn dispatch(&self, response: &CompletionResponse) -> Vec<ToolOutcome> {
        debug!(call_count = response.tool_calls.len(), "ToolDispatcher::dispatch: called");
        if response.tool_calls.is_empty() {
            return vec![ToolOutcome::NoToolCalls];
        }

        let mut outcomes = Vec::with_capacity(response.tool_calls.len());
        for call in &response.tool_calls {
            let outcome = self.execute(call).await;
            debug!(id = %call.id, outcome = %outcome.to_json(), "ToolDispatcher::dispatch: call finished");
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Execute a single tool call; failures become outcomes
    pub async fn execute(&self, call: &ToolCall) -> ToolOutcome {
        let Some(capability) = self.registry.get(&call.name) else {
            warn!(tool = %call.name, "Model requested unknown tool");
            return ToolOutcome::NotFound { tool: call.name.clone() };
        };

        let arguments: Value = match serde_json::from_str(&call.arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool arguments are not valid JSON");
                return ToolOutcome::InvalidArguments { tool: call.name.clone() };
            }
        };

        match capability.invoke(&arguments).await {
            Ok(result) => ToolOutcome::Success {
                tool: call.name.clone(),
                arguments,
                result,
            },
            Err(e) => ToolOutcome::Error {
                tool: call.name.clone(),
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use crate::prompts::PromptLoader;
    use std::sync::Arc;

    const ONE_DAY: &str = r#"{"itinerary": [{"day": 1, "location": "Bandipur", "elevation": 1030,
        "coordinates": {"latitude": 27.9365, "longitude": 84.4086}}]}"#;

    fn dispatcher(responses: Vec<CompletionResponse>) -> ToolDispatcher {
        ToolDispatcher::new(ToolRegistry::standard(
            Arc::new(MockLlmClient::new(responses)),
            Arc::new(PromptLoader::embedded_only().unwrap()),
            1024,
        ))
    }

    fn calls(calls: Vec<ToolCall>) -> CompletionResponse {
        CompletionResponse::with_tool_calls(calls)
    }

    #[tokio::test]
    async fn test_no_tool_calls() {
        let outcomes = dispatcher(vec![]).dispatch(&CompletionResponse::text("hi")).await;
        assert_eq!(outcomes, vec![ToolOutcome::NoToolCalls]);
        assert_eq!(outcomes[0].status(), Some("no_tool_calls"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let outcomes = dispatcher(vec![])
            .dispatch(&calls(vec![ToolCall::new("c1", "book_flight", "{}")]))
            .await;

        assert_eq!(
            outcomes,
            vec![ToolOutcome::NotFound {
                tool: "book_flight".to_string()
            }]
        );
        assert_eq!(outcomes[0].to_json(), json!({"tool": "book_flight", "status": "not_found"}));
    }

    #[tokio::test]
    async fn test_unparseable_arguments() {
        let outcomes = dispatcher(vec![])
            .dispatch(&calls(vec![ToolCall::new("c1", "generate_itinerary", "{destination: Pokhara")]))
            .await;

        assert_eq!(outcomes[0].status(), Some("invalid_arguments"));
        assert_eq!(outcomes[0].tool(), Some("generate_itinerary"));
    }

    #[tokio::test]
    async fn test_success_records_arguments_and_result() {
        let outcomes = dispatcher(vec![CompletionResponse::text(ONE_DAY)])
            .dispatch(&calls(vec![ToolCall::new(
                "c1",
                "generate_itinerary",
                r#"{"destination": "Bandipur"}"#,
            )]))
            .await;

        let outcome = &outcomes[0];
        assert_eq!(outcome.result().unwrap()["itinerary"][0]["location"], "Bandipur");
        let wire = outcome.to_json();
        assert_eq!(wire["arguments"], json!({"destination": "Bandipur"}));
        assert!(wire.get("status").is_none());
        assert!(wire.get("error").is_none());
    }

    #[tokio::test]
    async fn test_invocation_failure_is_error_outcome() {
        let outcomes = dispatcher(vec![CompletionResponse::text("not json")])
            .dispatch(&calls(vec![ToolCall::new("c1", "generate_itinerary", r#"{"destination": "X"}"#)]))
            .await;

        assert!(outcomes[0].error().is_some());
        assert!(outcomes[0].result().is_none());
        assert!(outcomes[0].status().is_none());
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_batch() {
        // Only c3 reaches the model; it consumes the single queued response
        let outcomes = dispatcher(vec![CompletionResponse::text(ONE_DAY)])
            .dispatch(&calls(vec![
                ToolCall::new("c1", "weather", "{}"),
                ToolCall::new("c2", "generate_itinerary", "nope"),
                ToolCall::new("c3", "generate_itinerary", r#"{"destination": "Bandipur"}"#),
                ToolCall::new("c4", "generate_itinerary", r#"{"destination": "Gorkha"}"#),
            ]))
            .await;

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].status(), Some("not_found"));
        assert_eq!(outcomes[1].status(), Some("invalid_arguments"));
        assert!(outcomes[2].result().is_some());
        // Mock exhausted: the tool reports the remote failure as an error
        assert!(outcomes[3].error().is_some());
    }

    #[test]
    fn test_wire_form_has_exactly_one_marker() {
        let all = vec![
            ToolOutcome::NoToolCalls,
            ToolOutcome::Success {
                tool: "t".into(),
                arguments: json!({}),
                result: json!({}),
            },
            ToolOutcome::NotFound { tool: "t".into() },
            ToolOutcome::InvalidArguments { tool: "t".into() },
            ToolOutcome::Error {
                tool: "t".into(),
                message: "m".into(),
            },
        ];
        for outcome in all {
            let wire = outcome.to_json();
            let markers = ["result", "error", "status"]
                .iter()
                .filter(|k| wire.get(**k).is_some())
                .count();
            assert_eq!(markers, 1, "{wire}");
        }
    }
}
