//! ToolRegistry - the named capabilities the model may invoke
//!
//! Each capability is a variant of [`Capability`]; adding one means adding a
//! variant and registering it, the dispatcher never changes.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::ToolError;
use super::itinerary::{ItineraryOutcome, ItineraryTool};
use crate::llm::{LlmClient, ToolDefinition};
use crate::prompts::PromptLoader;

/// An invocable capability
pub enum Capability {
    Itinerary(ItineraryTool),
}

impl Capability {
    /// Tool name (matches the function name the model calls)
    pub fn name(&self) -> &'static str {
        match self {
            Capability::Itinerary(_) => ItineraryTool::NAME,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Capability::Itinerary(tool) => tool.description(),
        }
    }

    /// JSON Schema for the arguments object
    pub fn input_schema(&self) -> Value {
        match self {
            Capability::Itinerary(tool) => tool.input_schema(),
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }

    /// Invoke with already-parsed arguments
    pub async fn invoke(&self, arguments: &Value) -> Result<Value, ToolError> {
        debug!(tool = %self.name(), "Capability::invoke: called");
        match self {
            Capability::Itinerary(tool) => {
                let destination = arguments
                    .get("destination")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ToolError::InvalidArgument("Missing required parameter: destination".to_string()))?;

                match tool.generate_itinerary(destination).await {
                    ItineraryOutcome::Itinerary(itinerary) => Ok(itinerary.into_value()),
                    ItineraryOutcome::Error { error } => Err(ToolError::Failed(error)),
                }
            }
        }
    }
}

/// Name-keyed set of capabilities
pub struct ToolRegistry {
    tools: BTreeMap<String, Capability>,
}

impl ToolRegistry {
    /// Registry with every built-in capability
    pub fn standard(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_tokens: u32) -> Self {
        debug!("ToolRegistry::standard: called");
        let mut registry = Self::empty();
        registry.add(Capability::Itinerary(ItineraryTool::new(llm, prompts, max_tokens)));
        registry
    }

    /// Create an empty registry (for testing)
    pub fn empty() -> Self {
        Self { tools: BTreeMap::new() }
    }

    /// Add a capability, replacing any with the same name
    pub fn add(&mut self, capability: Capability) {
        debug!(tool_name = %capability.name(), "ToolRegistry::add: called");
        self.tools.insert(capability.name().to_string(), capability);
    }

    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.tools.get(name)
    }

    /// Get tool definitions for LLM
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(Capability::definition).collect()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionResponse;
    use crate::llm::client::mock::MockLlmClient;
    use serde_json::json;

    fn registry(responses: Vec<CompletionResponse>) -> ToolRegistry {
        ToolRegistry::standard(
            Arc::new(MockLlmClient::new(responses)),
            Arc::new(PromptLoader::embedded_only().unwrap()),
            1024,
        )
    }

    #[test]
    fn test_standard_registry_has_itinerary() {
        let registry = registry(vec![]);
        assert!(registry.has_tool("generate_itinerary"));
        assert_eq!(registry.tool_names(), vec!["generate_itinerary".to_string()]);
    }

    #[test]
    fn test_definitions() {
        let defs = registry(vec![]).definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "generate_itinerary");
        assert!(defs[0].description.contains("itinerary"));
        assert_eq!(defs[0].parameters["properties"]["destination"]["type"], "string");
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::empty();
        assert!(registry.get("generate_itinerary").is_none());
        assert!(registry.definitions().is_empty());
    }

    #[tokio::test]
    async fn test_invoke_missing_destination() {
        let registry = registry(vec![]);
        let cap = registry.get("generate_itinerary").unwrap();

        let err = cap.invoke(&json!({"place": "Pokhara"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_invoke_tool_failure_becomes_error() {
        let registry = registry(vec![CompletionResponse::text("")]);
        let cap = registry.get("generate_itinerary").unwrap();

        let err = cap.invoke(&json!({"destination": "Pokhara"})).await.unwrap_err();
        assert_eq!(err.to_string(), "Empty response received from model.");
    }

    #[tokio::test]
    async fn test_invoke_success_returns_itinerary_document() {
        let doc = r#"{"itinerary": [{"day": 1, "location": "Lumbini", "elevation": 150,
            "coordinates": {"latitude": 27.4833, "longitude": 83.2767}}]}"#;
        let registry = registry(vec![CompletionResponse::text(doc)]);
        let cap = registry.get("generate_itinerary").unwrap();

        let value = cap.invoke(&json!({"destination": "Lumbini"})).await.unwrap();
        assert_eq!(value["itinerary"][0]["location"], "Lumbini");
    }
}
