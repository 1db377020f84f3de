use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use mocha_core::{MochaError, ToolCallingLlm};

use crate::{LlmRequest, LlmResponse, Message, Role, ToolCall, ToolSpec};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Clone, Debug)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    http: Client,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, MochaError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|err| MochaError::LlmProvider(err.to_string()))?;
        let base_url = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn list_models(&self) -> Result<Vec<String>, MochaError> {
        let url = format!("{}/api/tags", self.base_url);
        let response: OllamaTagsResponse = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| MochaError::LlmProvider(err.to_string()))?
            .error_for_status()
            .map_err(|err| MochaError::LlmProvider(err.to_string()))?
            .json()
            .await
            .map_err(|err| MochaError::LlmProvider(err.to_string()))?;

        Ok(response.models.into_iter().map(|model| model.name).collect())
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: String,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<OllamaTool<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: Role,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<OllamaToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    function: OllamaFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaFunctionCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Serialize)]
struct OllamaTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolSpec,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

impl From<Message> for OllamaMessage {
    fn from(message: Message) -> Self {
        let tool_calls = message
            .tool_calls
            .into_iter()
            .map(|call| OllamaToolCall {
                id: Some(call.id),
                function: OllamaFunctionCall {
                    name: call.name,
                    arguments: call.args,
                },
            })
            .collect();
        Self {
            role: message.role,
            content: Some(message.content.unwrap_or_default()),
            tool_calls,
            tool_call_id: message.tool_call_id,
            tool_name: message.tool_name,
        }
    }
}

impl OllamaMessage {
    fn into_response(self) -> LlmResponse {
        let tool_calls = self
            .tool_calls
            .into_iter()
            .enumerate()
            .map(|(index, call)| ToolCall {
                id: call
                    .id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| format!("call_{index}")),
                name: call.function.name,
                args: normalize_arguments(call.function.arguments),
            })
            .collect();
        let content = self.content.filter(|content| !content.is_empty());
        LlmResponse {
            content,
            tool_calls,
        }
    }
}

// Some models emit the argument object as an encoded JSON string.
fn normalize_arguments(arguments: Value) -> Value {
    match arguments {
        Value::String(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        Value::Null => Value::Object(Default::default()),
        other => other,
    }
}

#[async_trait::async_trait]
impl ToolCallingLlm for OllamaClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, MochaError> {
        let LlmRequest {
            model,
            messages,
            tools,
        } = input;
        let model = if model.is_empty() {
            self.model.clone()
        } else {
            model
        };
        let request = OllamaChatRequest {
            model,
            messages: messages.into_iter().map(OllamaMessage::from).collect(),
            tools: tools
                .iter()
                .map(|function| OllamaTool {
                    kind: "function",
                    function,
                })
                .collect(),
            stream: false,
        };

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "calling ollama chat"
        );

        let url = format!("{}/api/chat", self.base_url);
        let response: OllamaChatResponse = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| MochaError::LlmProvider(err.to_string()))?
            .error_for_status()
            .map_err(|err| MochaError::LlmProvider(err.to_string()))?
            .json()
            .await
            .map_err(|err| MochaError::LlmProvider(err.to_string()))?;

        Ok(response.message.into_response())
    }
}
