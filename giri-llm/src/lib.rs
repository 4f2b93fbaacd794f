//! Provider-agnostic LLM integration for GIRI.
//!
//! This crate exposes a common [`traits::LlmClient`] interface and concrete
//! provider implementations for Gemini and OpenAI. The chat relay never builds
//! a client itself; it asks a [`connector::Connector`] to turn a credential
//! into one, which keeps the provider swappable in tests.
//!
//! # Examples
//! ```no_run
//! use giri_llm::{config::LlmConfig, connect_provider};
//!
//! # fn main() -> giri_common::Result<()> {
//! let client = connect_provider(&LlmConfig::default(), "AIza-example")?;
//! assert_eq!(client.model_name(), "gemini-pro");
//! # Ok(())
//! # }
//! ```
pub mod config;
pub mod connector;
pub mod gemini;
pub mod openai;
pub mod traits;

use config::{LlmConfig, ProviderKind};
use giri_common::GiriError;
use std::sync::Arc;
use traits::LlmClient;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Build a client for the configured provider using `api_key`.
///
/// No request is made here; a bad key only shows up on the first completion.
pub fn connect_provider(
    config: &LlmConfig,
    api_key: &str,
) -> giri_common::Result<Arc<dyn LlmClient>> {
    let api_key = giri_http::sanitize_api_key(api_key)
        .map_err(|e| GiriError::ProviderAuth(e.to_string()))?;

    match config.provider {
        #[cfg(feature = "gemini")]
        ProviderKind::Gemini => {
            let client = match &config.endpoint {
                Some(base) => {
                    gemini::GeminiClient::with_base_url(base, api_key, config.model.clone())?
                }
                None => gemini::GeminiClient::new(api_key, config.model.clone())?,
            };
            Ok(Arc::new(client))
        }
        #[cfg(feature = "openai")]
        ProviderKind::OpenAi => {
            let client = match &config.endpoint {
                Some(base) => {
                    openai::OpenAiClient::with_base_url(base, api_key, config.model.clone())?
                }
                None => openai::OpenAiClient::new(api_key, config.model.clone())?,
            };
            Ok(Arc::new(client))
        }
        #[allow(unreachable_patterns)]
        other => Err(GiriError::ProviderCall(format!(
            "{} provider not enabled",
            other.label()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_rejected_before_any_call() {
        let err = match connect_provider(&LlmConfig::default(), "   ") {
            Err(e) => e,
            Ok(_) => panic!("blank key accepted"),
        };
        assert!(matches!(err, GiriError::ProviderAuth(_)));
    }

    #[test]
    fn connects_configured_model() {
        let cfg = LlmConfig::new(ProviderKind::OpenAi);
        let client = connect_provider(&cfg, " sk-test ").unwrap();
        assert_eq!(client.model_name(), DEFAULT_OPENAI_MODEL);
    }
}
