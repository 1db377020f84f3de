use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use mocha_core::{
    LlmRequest, LlmResponse, Message, MochaError, Role, ToolCall, ToolCallingLlm, ToolSpec,
};

use crate::{greeting_prompt, TimeOfDay, ToolRegistry, DEFAULT_SYSTEM_PROMPT};

pub const DEFAULT_MAX_STEPS: usize = 10;

const INTERRUPTED_RESULT: &str = "Interrupted before this tool call finished.";

/// Receives the model's narration ("Sure, turning off the lights now.")
/// while tool calls for the same turn are still running.
pub type StatusCallback = dyn Fn(&str) + Send + Sync;

/// One conversation with the model.
///
/// Owns the transcript for its whole lifetime. The transcript only grows, and
/// its first entry is always the system prompt. A turn alternates model calls
/// with in-order tool execution until the model answers without tool calls.
pub struct ConversationEngine {
    llm: Arc<dyn ToolCallingLlm>,
    tools: Arc<ToolRegistry>,
    specs: Vec<ToolSpec>,
    model: String,
    max_steps: usize,
    step_timeout: Option<Duration>,
    messages: Vec<Message>,
}

impl std::fmt::Debug for ConversationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationEngine")
            .field("model", &self.model)
            .field("tools", &self.tools)
            .field("max_steps", &self.max_steps)
            .field("messages", &self.messages.len())
            .finish()
    }
}

impl ConversationEngine {
    pub fn new(
        llm: Arc<dyn ToolCallingLlm>,
        tools: Arc<ToolRegistry>,
        model: impl Into<String>,
    ) -> Self {
        let specs = tools.specs();
        Self {
            llm,
            tools,
            specs,
            model: model.into(),
            max_steps: DEFAULT_MAX_STEPS,
            step_timeout: None,
            messages: vec![Message::system(DEFAULT_SYSTEM_PROMPT)],
        }
    }

    /// Upper bound on model calls within one turn. At least one call is always allowed.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.messages[0] = Message::system(prompt);
        self
    }

    /// Deadline for each model call; exceeding it fails the turn with [`MochaError::Timeout`].
    pub fn step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = Some(timeout);
        self
    }

    pub fn transcript(&self) -> &[Message] {
        &self.messages
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn greet(&mut self) -> Result<String, MochaError> {
        self.greet_at(TimeOfDay::now()).await
    }

    pub async fn greet_at(&mut self, time_of_day: TimeOfDay) -> Result<String, MochaError> {
        self.chat(&greeting_prompt(time_of_day), None).await
    }

    /// Runs one user turn to completion and returns the model's final answer.
    ///
    /// Model transport failures are returned as-is and the turn is abandoned;
    /// tool failures are written into the transcript for the model to handle.
    pub async fn chat(
        &mut self,
        input: &str,
        on_status: Option<&StatusCallback>,
    ) -> Result<String, MochaError> {
        self.close_interrupted_calls();
        self.messages.push(Message::user(input));

        for step in 0..self.max_steps {
            let response = self.call_model(step).await?;

            if response.tool_calls.is_empty() {
                let content = response.content.clone().unwrap_or_default();
                self.messages.push(response.into_message());
                return Ok(content);
            }

            if let (Some(text), Some(callback)) = (response.text(), on_status) {
                notify(callback, text);
            }

            let calls = response.tool_calls.clone();
            self.messages.push(response.into_message());

            for call in &calls {
                tracing::debug!(step, tool = %call.name, args = %call.args, "tool call");
                let result = self.tools.execute(&call.name, call.args.clone()).await;
                tracing::debug!(step, tool = %call.name, result = %result, "tool result");
                self.messages.push(Message::tool_result(call, result));
            }
        }

        tracing::warn!(max_steps = self.max_steps, "tool loop exceeded");
        Err(MochaError::MaxStepsExceeded {
            max: self.max_steps,
        })
    }

    /// A dropped `chat` future can leave the last assistant tool calls
    /// unanswered. Each of them gets a textual result before the next turn.
    fn close_interrupted_calls(&mut self) {
        let Some(last) = self
            .messages
            .iter()
            .rposition(|message| message.role == Role::Assistant)
        else {
            return;
        };

        let answered: HashSet<&str> = self.messages[last + 1..]
            .iter()
            .filter_map(|message| message.tool_call_id.as_deref())
            .collect();
        let pending: Vec<ToolCall> = self.messages[last]
            .tool_calls
            .iter()
            .filter(|call| !answered.contains(call.id.as_str()))
            .cloned()
            .collect();

        for call in &pending {
            tracing::warn!(tool = %call.name, id = %call.id, "closing interrupted tool call");
            self.messages.push(Message::tool_result(call, INTERRUPTED_RESULT));
        }
    }

    async fn call_model(&self, step: usize) -> Result<LlmResponse, MochaError> {
        let request = LlmRequest {
            model: self.model.clone(),
            messages: self.messages.clone(),
            tools: self.specs.clone(),
        };
        tracing::debug!(step, messages = request.messages.len(), "calling model");

        let response = match self.step_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.llm.invoke(request))
                .await
                .map_err(|_| MochaError::Timeout(timeout))?,
            None => self.llm.invoke(request).await,
        };
        if let Err(err) = &response {
            tracing::warn!(step, error = %err, "model call failed");
        }
        response
    }
}

fn notify(callback: &StatusCallback, text: &str) {
    if panic::catch_unwind(AssertUnwindSafe(|| callback(text))).is_err() {
        tracing::warn!("status callback panicked; continuing turn");
    }
}
