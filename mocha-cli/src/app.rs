use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;

use mocha_agent::{device_tools, ConversationEngine};
use mocha_devices::{FuzzyResolver, Lights, MatchResult, MemoryRegistry};
use mocha_llm::OllamaClient;

use crate::config::Settings;

/// Everything a subcommand needs, wired from [`Settings`].
pub struct App {
    pub settings: Settings,
    pub lights: Arc<Lights>,
    pub resolver: Arc<RwLock<FuzzyResolver>>,
    pub client: OllamaClient,
}

impl App {
    pub async fn build(settings: Settings) -> Result<Self> {
        let registry = match &settings.devices {
            Some(path) => MemoryRegistry::from_json_file(path)
                .with_context(|| format!("loading devices from {}", path.display()))?,
            None => {
                tracing::warn!("no device file configured, starting with no lights");
                MemoryRegistry::default()
            }
        };
        let lights = Arc::new(Lights::new(Arc::new(registry)));

        let mut resolver = FuzzyResolver::new().with_threshold(settings.threshold);
        resolver.set_devices(&lights.list_devices().await?);

        let client = OllamaClient::new(settings.base_url.clone(), settings.model.clone())?;

        Ok(Self {
            settings,
            lights,
            resolver: Arc::new(RwLock::new(resolver)),
            client,
        })
    }

    pub fn engine(&self) -> Result<ConversationEngine> {
        let tools = device_tools(
            self.lights.clone(),
            self.resolver.clone(),
            self.settings.refresh,
        )?;
        Ok(ConversationEngine::new(
            Arc::new(self.client.clone()),
            Arc::new(tools),
            self.settings.model.clone(),
        )
        .max_steps(self.settings.max_steps))
    }

    pub async fn devices(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.lights.list_devices().await?)
    }

    /// Scores against the current device list, not the startup snapshot.
    pub async fn search(&self, query: &str) -> Result<Vec<MatchResult>> {
        let devices = self.lights.list_devices().await?;
        let mut resolver = self.resolver.write().await;
        resolver.set_devices(&devices);
        Ok(resolver.search_scored(query)?)
    }
}
