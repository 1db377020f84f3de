use std::sync::Arc;

use mocha_agent::ConversationEngine;
use mocha_devices::Lights;
use tokio::sync::Mutex;

/// Shared handler state. Turns against the engine are serialized by the mutex.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<ConversationEngine>>,
    pub lights: Arc<Lights>,
}

impl AppState {
    pub fn new(engine: ConversationEngine, lights: Arc<Lights>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            lights,
        }
    }
}
