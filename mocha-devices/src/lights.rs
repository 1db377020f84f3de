use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::{DeviceError, DeviceRegistry, Hsv, PowerState};

/// Half period of the blink effect.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerChange {
    Changed,
    Unchanged,
}

/// Light operations over a [`DeviceRegistry`].
///
/// Every call re-reads the live device list, so a light that disappeared
/// since the last call is reported as [`DeviceError::NotFound`] rather than
/// addressed blindly.
#[derive(Clone)]
pub struct Lights {
    registry: Arc<dyn DeviceRegistry>,
}

impl std::fmt::Debug for Lights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lights").finish_non_exhaustive()
    }
}

impl Lights {
    pub fn new(registry: Arc<dyn DeviceRegistry>) -> Self {
        Self { registry }
    }

    pub async fn list_devices(&self) -> Result<BTreeMap<String, String>, DeviceError> {
        self.registry.list_devices().await
    }

    async fn ensure_known(&self, light: &str) -> Result<(), DeviceError> {
        if self.registry.list_devices().await?.contains_key(light) {
            Ok(())
        } else {
            tracing::warn!(light = %light, "light not found in discovered devices");
            Err(DeviceError::NotFound(light.to_string()))
        }
    }

    /// Switches the light only when its live state differs from `requested`.
    pub async fn power_light(
        &self,
        light: &str,
        requested: PowerState,
    ) -> Result<PowerChange, DeviceError> {
        self.ensure_known(light).await?;
        let current = self.registry.power_state(light).await?;
        if current == requested {
            tracing::info!(light = %light, status = %requested, "light already in requested state");
            return Ok(PowerChange::Unchanged);
        }
        self.registry.set_power(light, requested).await?;
        tracing::info!(light = %light, status = %requested, "light was turned {requested}");
        Ok(PowerChange::Changed)
    }

    pub async fn light_status(&self, light: &str) -> Result<PowerState, DeviceError> {
        self.ensure_known(light).await?;
        self.registry.power_state(light).await
    }

    pub async fn adjust_brightness(&self, light: &str, brightness: u8) -> Result<(), DeviceError> {
        if brightness > 100 {
            return Err(DeviceError::InvalidValue(format!(
                "brightness must be within 0..=100, got {brightness}"
            )));
        }
        self.ensure_known(light).await?;
        self.registry.set_brightness(light, brightness).await?;
        tracing::info!(light = %light, brightness, "brightness set");
        Ok(())
    }

    pub async fn adjust_hue(&self, light: &str, hsv: Hsv) -> Result<(), DeviceError> {
        let hsv = Hsv::new(hsv.hue, hsv.saturation, hsv.value)?;
        self.ensure_known(light).await?;
        self.registry.set_hsv(light, hsv).await?;
        tracing::info!(light = %light, color = %hsv, "color set");
        Ok(())
    }

    /// Toggles the light on and off `seconds * 2` times, one toggle every
    /// [`BLINK_INTERVAL`]. Returns once the last toggle has settled.
    pub async fn blink(&self, light: &str, seconds: u32) -> Result<(), DeviceError> {
        self.ensure_known(light).await?;
        let mut next = PowerState::On;
        for _ in 0..seconds.saturating_mul(2) {
            self.registry.set_power(light, next).await?;
            tokio::time::sleep(BLINK_INTERVAL).await;
            next = next.toggled();
        }
        tracing::info!(light = %light, seconds, "blink finished");
        Ok(())
    }
}
