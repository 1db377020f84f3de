mod engine;
mod prompt;
mod schema;
mod tool;
mod tools;

pub use engine::{ConversationEngine, StatusCallback, DEFAULT_MAX_STEPS};
pub use prompt::{greeting_prompt, TimeOfDay, DEFAULT_SYSTEM_PROMPT};
pub use schema::parameters_schema;
pub use tool::{parse_args, Tool, ToolRegistry, ToolRegistryBuilder, ToolRegistryError};
pub use tools::{
    device_tools, AdjustBrightness, AdjustHue, BlinkEffect, CorpusRefresh, LightStatus,
    ListDevices, PowerLight, SearchDevices,
};

pub use mocha_core::{Message, MochaError, Role, ToolError};
