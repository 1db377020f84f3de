use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MochaError {
    #[error("LLM provider failed: {0}")]
    LlmProvider(String),
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Tool loop exceeded {max} model round trips")]
    MaxStepsExceeded { max: usize },
}

impl MochaError {
    /// True when the model backend could not be reached or answered with a failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, MochaError::LlmProvider(_) | MochaError::Timeout(_))
    }
}
