use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::de::DeserializeOwned;

use mocha_core::{ToolError, ToolSpec, Value};

#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> Value;
    async fn call(&self, args: Value) -> Result<String, ToolError>;
}

/// Decodes tool arguments, accepting an object encoded as a JSON string.
/// Missing or mistyped fields become [`ToolError::InvalidInput`].
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    let args = match args {
        Value::String(raw) => serde_json::from_str(&raw)
            .map_err(|err| ToolError::InvalidInput(format!("arguments are not JSON: {err}")))?,
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(args).map_err(|err| ToolError::InvalidInput(err.to_string()))
}

/// Name to handler table. The catalog sent to the model ([`ToolRegistry::specs`])
/// and the dispatch table ([`ToolRegistry::execute`]) come from the same entries.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|tool| ToolSpec {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.schema(),
            })
            .collect()
    }

    /// Runs a tool and renders the outcome as text for the transcript.
    ///
    /// Never fails: unknown names, bad arguments and device errors all come
    /// back as text so the model can react to them.
    pub async fn execute(&self, name: &str, args: Value) -> String {
        let Some(&slot) = self.index.get(name) else {
            tracing::warn!(tool = %name, "model requested an unknown tool");
            return format!("Unknown tool: {name}");
        };

        match self.tools[slot].call(args).await {
            Ok(output) => output,
            Err(ToolError::InvalidInput(reason)) => {
                tracing::warn!(tool = %name, %reason, "malformed tool call");
                format!("Invalid arguments for {name}: {reason}")
            }
            Err(ToolError::NotFound(id)) => format!("{id} not found"),
            Err(err) => {
                tracing::warn!(tool = %name, error = %err, "tool failed");
                format!("Error running {name}: {err}")
            }
        }
    }
}

#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistryBuilder {
    pub fn register<T>(mut self, tool: T) -> Self
    where
        T: Tool + 'static,
    {
        self.tools.push(Box::new(tool));
        self
    }

    pub fn build(self) -> Result<ToolRegistry, ToolRegistryError> {
        let mut seen = HashSet::new();
        let mut index = HashMap::new();

        for (slot, tool) in self.tools.iter().enumerate() {
            let name = tool.name();
            if name.trim().is_empty() {
                return Err(ToolRegistryError::InvalidName {
                    name: name.to_string(),
                });
            }
            if !seen.insert(name.to_string()) {
                return Err(ToolRegistryError::DuplicateName {
                    name: name.to_string(),
                });
            }
            index.insert(name.to_string(), slot);
        }

        Ok(ToolRegistry {
            tools: self.tools,
            index,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolRegistryError {
    InvalidName { name: String },
    DuplicateName { name: String },
}

impl fmt::Display for ToolRegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolRegistryError::InvalidName { name } => {
                write!(f, "tool name must not be empty or whitespace: {name:?}")
            }
            ToolRegistryError::DuplicateName { name } => {
                write!(f, "duplicate tool name: {name}")
            }
        }
    }
}

impl std::error::Error for ToolRegistryError {}
