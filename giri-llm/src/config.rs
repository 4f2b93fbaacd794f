use serde::{Deserialize, Serialize};

/// Hosted generative-text providers the chat relay can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    #[serde(alias = "open_ai")]
    OpenAi,
}

impl ProviderKind {
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => crate::DEFAULT_GEMINI_MODEL,
            ProviderKind::OpenAi => crate::DEFAULT_OPENAI_MODEL,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::OpenAi => "OpenAI",
        }
    }
}

/// Provider selection without the credential; the key arrives at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub model: String,
    /// Override for the provider's API base (gateways, tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: crate::DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: None,
        }
    }
}

impl LlmConfig {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_deserialize() {
        let p: ProviderKind = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(p, ProviderKind::OpenAi);
        let p: ProviderKind = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(p, ProviderKind::Gemini);
    }

    #[test]
    fn defaults_follow_provider() {
        assert_eq!(LlmConfig::default().model, "gemini-pro");
        assert_eq!(LlmConfig::new(ProviderKind::OpenAi).model, "gpt-4o-mini");
    }
}
