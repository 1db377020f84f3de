use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use mocha_agent::{CorpusRefresh, DEFAULT_MAX_STEPS};
use mocha_llm::DEFAULT_BASE_URL;

use crate::cli::GlobalArgs;

pub const DEFAULT_MODEL: &str = "qwen2.5:14b";
pub const DEFAULT_THRESHOLD: f64 = 50.0;
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Contents of `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MochaConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub threshold: Option<f64>,
    pub max_steps: Option<usize>,
    pub devices: Option<PathBuf>,
    pub refresh: Option<CorpusRefresh>,
    pub bind: Option<SocketAddr>,
}

impl MochaConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// A missing file is not an error; it yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("mocha").join("config.json"))
    }
}

/// Effective settings: flags and environment over the config file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub model: String,
    pub threshold: f64,
    pub max_steps: usize,
    pub devices: Option<PathBuf>,
    pub refresh: CorpusRefresh,
    pub bind: SocketAddr,
}

impl Settings {
    pub fn resolve(args: &GlobalArgs, file: MochaConfig) -> Result<Self> {
        let threshold = args
            .threshold
            .or(file.threshold)
            .unwrap_or(DEFAULT_THRESHOLD);
        if !(0.0..=100.0).contains(&threshold) {
            return Err(anyhow!("threshold must be within 0-100, got {threshold}"));
        }

        let bind = match file.bind {
            Some(bind) => bind,
            None => DEFAULT_BIND.parse()?,
        };

        Ok(Self {
            base_url: args
                .base_url
                .clone()
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: args
                .model
                .clone()
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            threshold,
            max_steps: args
                .max_steps
                .or(file.max_steps)
                .unwrap_or(DEFAULT_MAX_STEPS),
            devices: args.devices.clone().or(file.devices),
            refresh: file.refresh.unwrap_or_default(),
            bind,
        })
    }
}
