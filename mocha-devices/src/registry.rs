use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DeviceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::On => "on",
            PowerState::Off => "off",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PowerState::On => PowerState::Off,
            PowerState::Off => PowerState::On,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(PowerState::On),
            "off" => Ok(PowerState::Off),
            other => Err(DeviceError::InvalidValue(format!(
                "power state must be \"on\" or \"off\", got {other:?}"
            ))),
        }
    }
}

/// Color as hue (0-360 degrees) with saturation and value percentages (0-100).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsv {
    pub hue: u16,
    pub saturation: u8,
    pub value: u8,
}

impl Hsv {
    pub fn new(hue: u16, saturation: u8, value: u8) -> Result<Self, DeviceError> {
        if hue > 360 {
            return Err(DeviceError::InvalidValue(format!(
                "hue must be within 0..=360, got {hue}"
            )));
        }
        if saturation > 100 || value > 100 {
            return Err(DeviceError::InvalidValue(format!(
                "saturation and value must be within 0..=100, got ({saturation}, {value})"
            )));
        }
        Ok(Self {
            hue,
            saturation,
            value,
        })
    }
}

impl fmt::Display for Hsv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HSV({}, {}, {})", self.hue, self.saturation, self.value)
    }
}

/// Raw device primitives for one network of lights.
///
/// Implementations talk to the devices; [`crate::Lights`] layers the
/// identifier checks, idempotent power changes and effects on top.
#[async_trait::async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Current identifier to display name mapping.
    async fn list_devices(&self) -> Result<BTreeMap<String, String>, DeviceError>;

    /// Live power state, read from the device.
    async fn power_state(&self, id: &str) -> Result<PowerState, DeviceError>;

    async fn set_power(&self, id: &str, state: PowerState) -> Result<(), DeviceError>;

    async fn set_brightness(&self, id: &str, brightness: u8) -> Result<(), DeviceError>;

    async fn set_hsv(&self, id: &str, hsv: Hsv) -> Result<(), DeviceError>;
}
