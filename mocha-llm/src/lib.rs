mod ollama;

pub use mocha_core::{LlmRequest, LlmResponse, Message, Role, ToolCall, ToolCallingLlm, ToolSpec};
pub use ollama::{OllamaClient, DEFAULT_BASE_URL};
