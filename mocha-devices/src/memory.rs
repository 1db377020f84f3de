use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::{DeviceError, DeviceRegistry, Hsv, PowerState};

fn full_brightness() -> u8 {
    100
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedLight {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub on: bool,
    #[serde(default = "full_brightness")]
    pub brightness: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Hsv>,
}

impl SimulatedLight {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            on: false,
            brightness: full_brightness(),
            color: None,
        }
    }
}

/// In-process lights, keyed by identifier.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    lights: Mutex<BTreeMap<String, SimulatedLight>>,
}

impl MemoryRegistry {
    pub fn new(lights: impl IntoIterator<Item = SimulatedLight>) -> Self {
        let lights = lights
            .into_iter()
            .map(|light| (light.id.clone(), light))
            .collect();
        Self {
            lights: Mutex::new(lights),
        }
    }

    /// Loads a JSON array of [`SimulatedLight`] entries.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DeviceError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let lights: Vec<SimulatedLight> = serde_json::from_str(&raw)?;
        tracing::debug!(path = %path.as_ref().display(), count = lights.len(), "loaded lights");
        Ok(Self::new(lights))
    }

    pub fn light(&self, id: &str) -> Option<SimulatedLight> {
        self.lock().get(id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, SimulatedLight>> {
        self.lights.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update<T>(
        &self,
        id: &str,
        apply: impl FnOnce(&mut SimulatedLight) -> T,
    ) -> Result<T, DeviceError> {
        let mut lights = self.lock();
        let light = lights
            .get_mut(id)
            .ok_or_else(|| DeviceError::NotFound(id.to_string()))?;
        Ok(apply(light))
    }
}

#[async_trait::async_trait]
impl DeviceRegistry for MemoryRegistry {
    async fn list_devices(&self) -> Result<BTreeMap<String, String>, DeviceError> {
        Ok(self
            .lock()
            .values()
            .map(|light| (light.id.clone(), light.name.clone()))
            .collect())
    }

    async fn power_state(&self, id: &str) -> Result<PowerState, DeviceError> {
        self.update(id, |light| {
            if light.on {
                PowerState::On
            } else {
                PowerState::Off
            }
        })
    }

    async fn set_power(&self, id: &str, state: PowerState) -> Result<(), DeviceError> {
        self.update(id, |light| light.on = state == PowerState::On)
    }

    async fn set_brightness(&self, id: &str, brightness: u8) -> Result<(), DeviceError> {
        self.update(id, |light| light.brightness = brightness)
    }

    async fn set_hsv(&self, id: &str, hsv: Hsv) -> Result<(), DeviceError> {
        self.update(id, |light| light.color = Some(hsv))
    }
}
