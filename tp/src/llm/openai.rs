//! OpenAI-compatible Chat Completions client
//!
//! Groq exposes the OpenAI wire format under `https://api.groq.com/openai`,
//! so one implementation serves both providers. Requests are sent once; there
//! is no retry or backoff.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, Role, StopReason, TokenUsage, ToolCall};
use crate::config::LlmConfig;

/// OpenAI-compatible API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl OpenAIClient {
    /// Create a client, reading the API key from the environment
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(provider = %config.provider, model = %config.model, "from_config: called");
        let api_key = config.get_api_key()?;
        Self::new(config, api_key)
    }

    /// Create a client with an explicit API key
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(ms) = config.timeout_ms {
            debug!(%ms, "new: applying request timeout");
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder.build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the Chat Completions API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let messages: Vec<serde_json::Value> = request
            .messages
            .iter()
            .map(|msg| {
                let role = match msg.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                serde_json::json!({
                    "role": role,
                    "content": msg.content,
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": request.max_tokens.min(self.max_tokens),
        });

        if !request.tools.is_empty() {
            debug!("build_request_body: tools not empty, adding tools");
            body["tools"] = serde_json::json!(request.tools.iter().map(|t| t.to_openai_schema()).collect::<Vec<_>>());
            body["tool_choice"] = serde_json::json!("auto");
        } else {
            debug!("build_request_body: no tools");
        }

        body
    }

    /// Parse the API response
    fn parse_response(&self, api_response: OpenAIResponse) -> CompletionResponse {
        debug!(choice_count = api_response.choices.len(), "parse_response: called");
        let choice = api_response.choices.into_iter().next();

        let (content, tool_calls, stop_reason) = match choice {
            Some(c) => {
                let tool_calls = c
                    .message
                    .tool_calls
                    .unwrap_or_default()
                    .into_iter()
                    .map(|tc| ToolCall {
                        id: tc.id,
                        name: tc.function.name,
                        arguments: tc.function.arguments,
                    })
                    .collect();
                (
                    c.message.content,
                    tool_calls,
                    StopReason::from_openai(c.finish_reason.as_deref()),
                )
            }
            None => {
                debug!("parse_response: no choices in response");
                (None, vec![], StopReason::EndTurn)
            }
        };

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        CompletionResponse {
            content,
            tool_calls,
            stop_reason,
            usage,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, message_count = request.messages.len(), tool_count = request.tools.len(), "complete: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();

        if status == 429 {
            debug!("complete: rate limited (429)");
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            debug!(%status, "complete: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        let text = response.text().await?;
        let api_response: OpenAIResponse = serde_json::from_str(&text)?;
        let parsed = self.parse_response(api_response);
        info!(
            model = %self.model,
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            tool_calls = parsed.tool_calls.len(),
            "complete: success"
        );
        Ok(parsed)
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIToolCall {
    id: String,
    function: OpenAIFunction,
}

#[derive(Debug, Deserialize)]
struct OpenAIFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Message, ToolDefinition};

    fn client(max_tokens: u32) -> OpenAIClient {
        let config = LlmConfig {
            max_tokens,
            base_url: "https://api.groq.com/openai/".to_string(),
            ..Default::default()
        };
        OpenAIClient::new(&config, "test-key").unwrap()
    }

    #[test]
    fn test_build_request_body_basic() {
        let request = CompletionRequest {
            messages: vec![Message::system("You are helpful"), Message::user("Hello")],
            tools: vec![],
            max_tokens: 1000,
        };

        let body = client(8192).build_request_body(&request);

        assert_eq!(body["model"], "llama3-70b-8192");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are helpful");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[test]
    fn test_build_request_body_with_tools() {
        let request = CompletionRequest {
            messages: vec![Message::user("Plan a trip")],
            tools: vec![ToolDefinition::new("generate_itinerary", "d", serde_json::json!({"type": "object"}))],
            max_tokens: 1000,
        };

        let body = client(8192).build_request_body(&request);

        assert_eq!(body["tools"][0]["function"]["name"], "generate_itinerary");
        assert_eq!(body["tool_choice"], "auto");
    }

    #[test]
    fn test_max_tokens_capped() {
        let request = CompletionRequest {
            messages: vec![],
            tools: vec![],
            max_tokens: 5000,
        };

        let body = client(1000).build_request_body(&request);
        assert_eq!(body["max_tokens"], 1000);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client(10).base_url, "https://api.groq.com/openai");
    }

    #[test]
    fn test_parse_text_response() {
        let raw = r#"{
            "choices": [{
                "message": {"role": "assistant", "content": "Spring is lovely."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        }"#;
        let api: OpenAIResponse = serde_json::from_str(raw).unwrap();
        let resp = client(10).parse_response(api);

        assert_eq!(resp.content.as_deref(), Some("Spring is lovely."));
        assert!(resp.tool_calls.is_empty());
        assert_eq!(resp.stop_reason, StopReason::EndTurn);
        assert_eq!(resp.usage.input_tokens, 12);
    }

    #[test]
    fn test_parse_tool_call_response_keeps_raw_arguments() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "generate_itinerary", "arguments": "{\"destination\": \"Pokhara\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }"#;
        let api: OpenAIResponse = serde_json::from_str(raw).unwrap();
        let resp = client(10).parse_response(api);

        assert!(resp.content.is_none());
        assert_eq!(resp.stop_reason, StopReason::ToolUse);
        assert_eq!(resp.tool_calls.len(), 1);
        assert_eq!(resp.tool_calls[0].id, "call_abc");
        assert_eq!(resp.tool_calls[0].name, "generate_itinerary");
        assert_eq!(resp.tool_calls[0].arguments, "{\"destination\": \"Pokhara\"}");
        assert_eq!(resp.usage.output_tokens, 0);
    }

    #[test]
    fn test_parse_empty_choices() {
        let api: OpenAIResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let resp = client(10).parse_response(api);

        assert!(resp.content.is_none());
        assert!(resp.tool_calls.is_empty());
    }
}
