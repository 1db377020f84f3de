#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use mocha_agent::{device_tools, CorpusRefresh, ToolRegistry};
use mocha_core::{LlmRequest, LlmResponse, MochaError, ToolCall, ToolCallingLlm};
use mocha_devices::{DeviceError, DeviceRegistry, FuzzyResolver, Hsv, Lights, PowerState};

/// Replays canned model responses and records every request it receives.
#[derive(Default)]
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<Result<LlmResponse, MochaError>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<Result<LlmResponse, MochaError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ToolCallingLlm for ScriptedLlm {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, MochaError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(MochaError::LlmProvider("script exhausted".to_string())))
    }
}

pub fn answer(text: &str) -> Result<LlmResponse, MochaError> {
    Ok(LlmResponse {
        content: Some(text.to_string()),
        tool_calls: vec![],
    })
}

pub fn call(id: &str, name: &str, args: Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        args,
    }
}

pub fn tool_calls(narration: Option<&str>, calls: Vec<ToolCall>) -> Result<LlmResponse, MochaError> {
    Ok(LlmResponse {
        content: narration.map(str::to_string),
        tool_calls: calls,
    })
}

/// Lights keyed by identifier, with a log of every power command issued.
#[derive(Default)]
pub struct FakeRegistry {
    pub devices: Mutex<BTreeMap<String, (String, bool)>>,
    pub power_calls: Mutex<Vec<(String, PowerState)>>,
    pub brightness: Mutex<Vec<(String, u8)>>,
    pub colors: Mutex<Vec<(String, Hsv)>>,
}

impl FakeRegistry {
    pub fn with(lights: &[(&str, &str, bool)]) -> Arc<Self> {
        let registry = Self::default();
        {
            let mut devices = registry.devices.lock().unwrap();
            for (id, name, on) in lights {
                devices.insert(id.to_string(), (name.to_string(), *on));
            }
        }
        Arc::new(registry)
    }

    pub fn add(&self, id: &str, name: &str) {
        self.devices
            .lock()
            .unwrap()
            .insert(id.to_string(), (name.to_string(), false));
    }

    pub fn power_calls(&self) -> Vec<(String, PowerState)> {
        self.power_calls.lock().unwrap().clone()
    }

    pub fn is_on(&self, id: &str) -> bool {
        self.devices.lock().unwrap()[id].1
    }
}

#[async_trait]
impl DeviceRegistry for FakeRegistry {
    async fn list_devices(&self) -> Result<BTreeMap<String, String>, DeviceError> {
        Ok(self
            .devices
            .lock()
            .unwrap()
            .iter()
            .map(|(id, (name, _))| (id.clone(), name.clone()))
            .collect())
    }

    async fn power_state(&self, id: &str) -> Result<PowerState, DeviceError> {
        let devices = self.devices.lock().unwrap();
        let (_, on) = devices
            .get(id)
            .ok_or_else(|| DeviceError::NotFound(id.to_string()))?;
        Ok(if *on { PowerState::On } else { PowerState::Off })
    }

    async fn set_power(&self, id: &str, state: PowerState) -> Result<(), DeviceError> {
        let mut devices = self.devices.lock().unwrap();
        let entry = devices
            .get_mut(id)
            .ok_or_else(|| DeviceError::NotFound(id.to_string()))?;
        entry.1 = state == PowerState::On;
        self.power_calls.lock().unwrap().push((id.to_string(), state));
        Ok(())
    }

    async fn set_brightness(&self, id: &str, brightness: u8) -> Result<(), DeviceError> {
        self.brightness
            .lock()
            .unwrap()
            .push((id.to_string(), brightness));
        Ok(())
    }

    async fn set_hsv(&self, id: &str, hsv: Hsv) -> Result<(), DeviceError> {
        self.colors.lock().unwrap().push((id.to_string(), hsv));
        Ok(())
    }
}

pub fn house() -> Arc<FakeRegistry> {
    FakeRegistry::with(&[
        ("10.0.0.1", "Bedroom Lamp", false),
        ("10.0.0.2", "Kitchen Light", true),
    ])
}

pub fn registry_for(
    devices: Arc<FakeRegistry>,
    refresh: CorpusRefresh,
) -> (Arc<RwLock<FuzzyResolver>>, Arc<ToolRegistry>) {
    let lights = Arc::new(Lights::new(devices));
    let resolver = Arc::new(RwLock::new(FuzzyResolver::new().with_threshold(50.0)));
    let tools = device_tools(lights, resolver.clone(), refresh).expect("tool registry");
    (resolver, Arc::new(tools))
}
