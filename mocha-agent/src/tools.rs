use std::fmt::Write as _;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use tokio::sync::RwLock;

use mocha_core::{ToolError, Value};
use mocha_devices::{DeviceError, FuzzyResolver, Hsv, Lights, PowerChange, PowerState};

use crate::{parameters_schema, parse_args, Tool, ToolRegistry, ToolRegistryError};

/// When the search corpus is rebuilt from the device list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusRefresh {
    /// Search whatever corpus the resolver was configured with.
    Snapshot,
    /// Reload the corpus from the live device list before every search.
    #[default]
    PerSearch,
}

/// Builds the device tool catalog in the order the model sees it.
pub fn device_tools(
    lights: Arc<Lights>,
    resolver: Arc<RwLock<FuzzyResolver>>,
    refresh: CorpusRefresh,
) -> Result<ToolRegistry, ToolRegistryError> {
    ToolRegistry::builder()
        .register(ListDevices::new(lights.clone()))
        .register(SearchDevices::new(lights.clone(), resolver, refresh))
        .register(PowerLight::new(lights.clone()))
        .register(LightStatus::new(lights.clone()))
        .register(AdjustBrightness::new(lights.clone()))
        .register(AdjustHue::new(lights.clone()))
        .register(BlinkEffect::new(lights))
        .build()
}

fn device_error(err: DeviceError) -> ToolError {
    match err {
        DeviceError::NotFound(id) => ToolError::NotFound(id),
        DeviceError::InvalidValue(reason) => ToolError::InvalidInput(reason),
        other => ToolError::ExecutionFailed(other.to_string()),
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct NoArgs {}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchArgs {
    /// Search term to match against device names or IPs (e.g. 'bedroom', 'living room')
    query: String,
}

#[derive(Clone, Copy, Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
enum Switch {
    On,
    Off,
}

impl From<Switch> for PowerState {
    fn from(switch: Switch) -> Self {
        match switch {
            Switch::On => PowerState::On,
            Switch::Off => PowerState::Off,
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PowerArgs {
    /// The IP address of the light (e.g. '10.0.0.90')
    light: String,
    /// Whether to turn the light on or off
    requested_status: Switch,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct LightArgs {
    /// The IP address of the light (e.g. '10.0.0.90')
    light: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct BrightnessArgs {
    /// The IP address of the light (e.g. '10.0.0.90')
    light: String,
    /// Brightness level from 0 to 100
    #[schemars(range(min = 0, max = 100))]
    brightness: u8,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct HueArgs {
    /// The IP address of the light (e.g. '10.0.0.90')
    light: String,
    /// Hue value from 0 to 360 (color wheel degree)
    #[schemars(range(min = 0, max = 360))]
    hue: u16,
    /// Saturation from 0 to 100 (0 = white, 100 = full color)
    #[schemars(range(min = 0, max = 100))]
    saturation: u8,
    /// Value/brightness from 0 to 100
    #[schemars(range(min = 0, max = 100))]
    value: u8,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct BlinkArgs {
    /// The IP address of the light (e.g. '10.0.0.90')
    light: String,
    /// Duration in seconds to blink the light
    seconds: u32,
}

fn render_devices<'a>(devices: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut out = String::new();
    for (id, name) in devices {
        let _ = writeln!(out, "{id}: {name}");
    }
    out.trim_end().to_string()
}

pub struct ListDevices {
    lights: Arc<Lights>,
}

impl ListDevices {
    pub fn new(lights: Arc<Lights>) -> Self {
        Self { lights }
    }
}

#[async_trait::async_trait]
impl Tool for ListDevices {
    fn name(&self) -> &str {
        "list_devices"
    }

    fn description(&self) -> &str {
        "List all discovered smart devices on the network. Returns each device IP address with its name."
    }

    fn schema(&self) -> Value {
        parameters_schema::<NoArgs>()
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let NoArgs {} = parse_args(args)?;
        let devices = self.lights.list_devices().await.map_err(device_error)?;
        if devices.is_empty() {
            return Ok("No devices found.".to_string());
        }
        Ok(render_devices(
            devices.iter().map(|(id, name)| (id.as_str(), name.as_str())),
        ))
    }
}

pub struct SearchDevices {
    lights: Arc<Lights>,
    resolver: Arc<RwLock<FuzzyResolver>>,
    refresh: CorpusRefresh,
}

impl SearchDevices {
    pub fn new(
        lights: Arc<Lights>,
        resolver: Arc<RwLock<FuzzyResolver>>,
        refresh: CorpusRefresh,
    ) -> Self {
        Self {
            lights,
            resolver,
            refresh,
        }
    }
}

#[async_trait::async_trait]
impl Tool for SearchDevices {
    fn name(&self) -> &str {
        "search_devices"
    }

    fn description(&self) -> &str {
        "Fuzzy search for smart devices by name or IP address. Use this to resolve a user's description (like 'bedroom lights') to actual device IPs before controlling them."
    }

    fn schema(&self) -> Value {
        parameters_schema::<SearchArgs>()
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let SearchArgs { query } = parse_args(args)?;

        if self.refresh == CorpusRefresh::PerSearch {
            let devices = self.lights.list_devices().await.map_err(device_error)?;
            self.resolver.write().await.set_devices(&devices);
        }

        let resolver = self.resolver.read().await;
        let matches = resolver
            .search(&query)
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        tracing::debug!(query = %query, matches = matches.len(), "device search");

        if matches.is_empty() {
            return Ok("No matching devices found.".to_string());
        }
        Ok(render_devices(matches.iter().map(|id| {
            (
                id.as_str(),
                resolver.display_name(id).unwrap_or("Unknown"),
            )
        })))
    }
}

pub struct PowerLight {
    lights: Arc<Lights>,
}

impl PowerLight {
    pub fn new(lights: Arc<Lights>) -> Self {
        Self { lights }
    }
}

#[async_trait::async_trait]
impl Tool for PowerLight {
    fn name(&self) -> &str {
        "power_light"
    }

    fn description(&self) -> &str {
        "Turn a smart light on or off by its IP address. Always use search_devices first to resolve device names to IPs."
    }

    fn schema(&self) -> Value {
        parameters_schema::<PowerArgs>()
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let PowerArgs {
            light,
            requested_status,
        } = parse_args(args)?;
        let requested = PowerState::from(requested_status);
        let change = self
            .lights
            .power_light(&light, requested)
            .await
            .map_err(device_error)?;
        Ok(match change {
            PowerChange::Changed => format!("Turned {requested} light at {light}"),
            PowerChange::Unchanged => format!("Light at {light} was already {requested}"),
        })
    }
}

pub struct LightStatus {
    lights: Arc<Lights>,
}

impl LightStatus {
    pub fn new(lights: Arc<Lights>) -> Self {
        Self { lights }
    }
}

#[async_trait::async_trait]
impl Tool for LightStatus {
    fn name(&self) -> &str {
        "light_status"
    }

    fn description(&self) -> &str {
        "Check whether a smart light is currently on or off. Use search_devices first to resolve device names to IPs."
    }

    fn schema(&self) -> Value {
        parameters_schema::<LightArgs>()
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let LightArgs { light } = parse_args(args)?;
        let state = self
            .lights
            .light_status(&light)
            .await
            .map_err(device_error)?;
        Ok(format!("{light} is {state}"))
    }
}

pub struct AdjustBrightness {
    lights: Arc<Lights>,
}

impl AdjustBrightness {
    pub fn new(lights: Arc<Lights>) -> Self {
        Self { lights }
    }
}

#[async_trait::async_trait]
impl Tool for AdjustBrightness {
    fn name(&self) -> &str {
        "adjust_brightness"
    }

    fn description(&self) -> &str {
        "Set the brightness of a smart light. Use search_devices first to resolve device names to IPs."
    }

    fn schema(&self) -> Value {
        parameters_schema::<BrightnessArgs>()
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let BrightnessArgs { light, brightness } = parse_args(args)?;
        self.lights
            .adjust_brightness(&light, brightness)
            .await
            .map_err(device_error)?;
        Ok(format!("Set brightness of {light} to {brightness}%"))
    }
}

pub struct AdjustHue {
    lights: Arc<Lights>,
}

impl AdjustHue {
    pub fn new(lights: Arc<Lights>) -> Self {
        Self { lights }
    }
}

#[async_trait::async_trait]
impl Tool for AdjustHue {
    fn name(&self) -> &str {
        "adjust_hue"
    }

    fn description(&self) -> &str {
        "Set the color of a smart light using HSV values. You must convert color names to HSV. Examples: 'red' = (0, 100, 100), 'light blue' = (200, 50, 100), 'warm white' = (30, 20, 100), 'purple' = (270, 100, 100), 'green' = (120, 100, 100). Use search_devices first to resolve device names to IPs."
    }

    fn schema(&self) -> Value {
        parameters_schema::<HueArgs>()
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let HueArgs {
            light,
            hue,
            saturation,
            value,
        } = parse_args(args)?;
        let hsv = Hsv::new(hue, saturation, value).map_err(device_error)?;
        self.lights
            .adjust_hue(&light, hsv)
            .await
            .map_err(device_error)?;
        Ok(format!("Set color of {light} to {hsv}"))
    }
}

pub struct BlinkEffect {
    lights: Arc<Lights>,
}

impl BlinkEffect {
    pub fn new(lights: Arc<Lights>) -> Self {
        Self { lights }
    }
}

#[async_trait::async_trait]
impl Tool for BlinkEffect {
    fn name(&self) -> &str {
        "blink_effect"
    }

    fn description(&self) -> &str {
        "Blink a smart light on and off repeatedly. The seconds parameter must be in seconds. Convert any time the user provides to seconds (e.g. '2 minutes' = 120, '30 seconds' = 30, '1 hour' = 3600). Use search_devices first to resolve device names to IPs."
    }

    fn schema(&self) -> Value {
        parameters_schema::<BlinkArgs>()
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let BlinkArgs { light, seconds } = parse_args(args)?;
        self.lights
            .blink(&light, seconds)
            .await
            .map_err(device_error)?;
        Ok(format!("Blinked {light} for {seconds} seconds"))
    }
}
