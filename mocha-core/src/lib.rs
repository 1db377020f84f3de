mod error;
mod llm;
mod tool;
mod value;

pub use error::MochaError;
pub use llm::{LlmRequest, LlmResponse, Message, Role, ToolCall, ToolCallingLlm, ToolSpec};
pub use tool::ToolError;
pub use value::Value;
