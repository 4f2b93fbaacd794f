use anyhow::{Context, Result};
use giri_common::observability::LogConfig;
use giri_config::{GiriConfig, GiriConfigLoader};
use giri_listings::ListingService;
use giri_llm::connector::ProviderConnector;
use giri_session::Session;
use std::path::Path;
use std::sync::Arc;

/// Explicit file when given (must exist), otherwise the optional defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<GiriConfig> {
    let loader = match explicit {
        Some(path) => GiriConfigLoader::new().with_file(path),
        None => GiriConfigLoader::new().with_default_locations(),
    };
    loader.load().context("failed to load configuration")
}

pub fn log_config(cfg: &GiriConfig, emit_stderr: bool) -> LogConfig {
    LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr,
        format: cfg.logging.log_format(),
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    }
}

/// A fresh session plus the notice to show when a configured key was loaded.
///
/// A configured key that fails validation is logged and ignored so the user
/// can still enter one by hand.
pub fn build_session(cfg: &GiriConfig) -> Result<(Session, Option<&'static str>)> {
    let listings = ListingService::new(&cfg.listings).context("invalid listing configuration")?;
    let connector = ProviderConnector::new(cfg.llm.to_llm_config());
    let mut session = Session::start(listings, cfg.listings.cache_ttl(), Arc::new(connector));

    let notice = match cfg.llm.resolved_api_key() {
        Some(key) => match session.preload_key(&key) {
            Ok(msg) => Some(msg),
            Err(e) => {
                tracing::warn!(error = %e, "configured API key rejected");
                None
            }
        },
        None => None,
    };
    Ok((session, notice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use giri_session::RelayState;

    #[test]
    fn configured_key_makes_relay_ready() {
        let cfg = GiriConfigLoader::new()
            .with_yaml_str("llm:\n  api_key: AIza-from-config\n")
            .load()
            .unwrap();
        let (session, notice) = build_session(&cfg).unwrap();
        assert_eq!(notice, Some("API key loaded"));
        assert_eq!(session.relay().state(), RelayState::Ready);
    }

    #[test]
    fn without_key_relay_awaits_one() {
        temp_env::with_var_unset("GEMINI_API_KEY", || {
            let cfg = GiriConfigLoader::new().load().unwrap();
            let (session, notice) = build_session(&cfg).unwrap();
            assert_eq!(notice, None);
            assert_eq!(session.relay().state(), RelayState::AwaitingKey);
        });
    }

    #[test]
    fn log_settings_follow_config() {
        let cfg = GiriConfigLoader::new()
            .with_yaml_str("logging:\n  format: json\n  filter: debug\n")
            .load()
            .unwrap();
        let log = log_config(&cfg, true);
        assert_eq!(log.format, giri_common::observability::LogFormat::Json);
        assert_eq!(log.default_filter, "debug");
        assert_eq!(log.app_name, "giri");
        assert!(log.emit_stderr);
    }
}
