use crate::config::LlmConfig;
use crate::traits::LlmClient;
use giri_common::Result;
use std::sync::Arc;

/// Turns a credential into a ready client.
///
/// The chat relay holds one of these instead of a concrete provider so a
/// session can reconnect whenever the key changes.
pub trait Connector: Send + Sync {
    fn connect(&self, api_key: &str) -> Result<Arc<dyn LlmClient>>;

    /// Human-readable provider name for status lines.
    fn provider_label(&self) -> &str {
        "LLM"
    }
}

/// [`Connector`] backed by the hosted providers in this crate.
#[derive(Debug, Clone, Default)]
pub struct ProviderConnector {
    config: LlmConfig,
}

impl ProviderConnector {
    pub fn new(config: LlmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }
}

impl Connector for ProviderConnector {
    fn connect(&self, api_key: &str) -> Result<Arc<dyn LlmClient>> {
        tracing::info!(
            provider = self.config.provider.label(),
            model = %self.config.model,
            "llm.connect"
        );
        crate::connect_provider(&self.config, api_key)
    }

    fn provider_label(&self) -> &str {
        self.config.provider.label()
    }
}
