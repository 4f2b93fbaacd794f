//! Loader for GIRI configuration with YAML + environment overlays.
//!
//! Precedence, lowest first: built-in defaults, YAML files/snippets in the
//! order they were added, then `GIRI__`-prefixed environment variables
//! (`GIRI__LISTINGS__MAX_ITEMS=5` sets `listings.max_items`). String values
//! may reference other variables as `${VAR}`; expansion is recursive up to a
//! fixed depth and unknown variables are left in place.
//!
//! Every field has a default, so an empty configuration is valid:
//!
//! ```
//! use giri_config::GiriConfigLoader;
//!
//! let cfg = GiriConfigLoader::new().load().unwrap();
//! assert_eq!(cfg.listings.url, "https://www.real.discount/store/udemy/");
//! assert_eq!(cfg.listings.max_items, 20);
//! assert_eq!(cfg.llm.to_llm_config().model, "gemini-pro");
//! ```
use config::{Config, ConfigError, Environment, File, FileFormat};
use giri_common::observability::LogFormat;
use giri_listings::{ListingSettings, MAX_LISTING_ITEMS};
use giri_llm::config::{LlmConfig, ProviderKind};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const ENV_PREFIX: &str = "GIRI";
pub const CONFIG_FILE_NAME: &str = "giri.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GiriConfig {
    pub listings: ListingSettings,
    pub llm: LlmSection,
    pub logging: LoggingSection,
}

/// Provider choice plus the optional credential.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub provider: ProviderKind,
    /// Falls back to the provider's default model.
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl LlmSection {
    pub fn to_llm_config(&self) -> LlmConfig {
        let mut cfg = LlmConfig::new(self.provider);
        if let Some(model) = self.model.as_deref().filter(|m| !m.trim().is_empty()) {
            cfg.model = model.trim().to_string();
        }
        cfg.endpoint = self.endpoint.clone().filter(|e| !e.trim().is_empty());
        cfg
    }

    /// Environment variable consulted when `api_key` is not configured.
    pub fn key_env_var(&self) -> &'static str {
        match self.provider {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// The usable credential, if any.
    ///
    /// Blank values and placeholders whose variable was never set count as
    /// absent, so the UI falls back to asking for a key.
    pub fn resolved_api_key(&self) -> Option<String> {
        let configured = self.api_key.clone().or_else(|| std::env::var(self.key_env_var()).ok());
        configured
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && !k.contains("${"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub dir: Option<PathBuf>,
    pub format: String,
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            dir: None,
            format: "text".to_string(),
            filter: "info".to_string(),
        }
    }
}

impl LoggingSection {
    pub fn log_format(&self) -> LogFormat {
        LogFormat::from_name(&self.format)
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Per-user config file under the platform config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("giri").join(CONFIG_FILE_NAME))
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct GiriConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: String,
}

impl Default for GiriConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl GiriConfigLoader {
    /// Defaults plus `GIRI__` env overrides; add files with the `with_*` methods.
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Use a different environment prefix (tests).
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// The user config file, then `./giri.yaml`, both optional.
    pub fn with_default_locations(mut self) -> Self {
        if let Some(user) = user_config_path() {
            self = self.with_optional_file(user);
        }
        self.with_optional_file(CONFIG_FILE_NAME)
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use giri_config::GiriConfigLoader;
    ///
    /// let cfg = GiriConfigLoader::new()
    ///     .with_yaml_str("listings:\n  max_items: 50\n  selectors:\n    image: null\n")
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.listings.max_items, 20);
    /// assert_eq!(cfg.listings.selectors.image, None);
    /// assert_eq!(cfg.listings.selectors.title, "h3");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    pub fn load(self) -> Result<GiriConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let mut typed: GiriConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        if typed.listings.max_items > MAX_LISTING_ITEMS {
            tracing::warn!(
                requested = typed.listings.max_items,
                cap = MAX_LISTING_ITEMS,
                "config.listings.max_items_clamped"
            );
            typed.listings.max_items = MAX_LISTING_ITEMS;
        }

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("GIRI_T_FOO", Some("bar"), || {
            let mut v = json!("prefix-${GIRI_T_FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars(
            [("GIRI_T_HOST", Some("example.org")), ("GIRI_T_PATH", Some("store"))],
            || {
                let mut v = json!([
                    "https://$GIRI_T_HOST/",
                    { "url": "https://${GIRI_T_HOST}/${GIRI_T_PATH}/" },
                    20,
                    null
                ]);
                expand_env_in_value(&mut v);
                assert_eq!(
                    v,
                    json!([
                        "https://example.org/",
                        { "url": "https://example.org/store/" },
                        20,
                        null
                    ])
                );
            },
        );
    }

    #[test]
    fn expands_recursively_and_stops_on_cycles() {
        temp_env::with_vars(
            [
                ("GIRI_T_BAZ", Some("qux")),
                ("GIRI_T_BAR", Some("mid-${GIRI_T_BAZ}")),
                ("GIRI_T_A", Some("${GIRI_T_B}")),
                ("GIRI_T_B", Some("${GIRI_T_A}")),
            ],
            || {
                let mut v = json!("X=${GIRI_T_BAR}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=mid-qux"));

                let mut v = json!("x=${GIRI_T_A}-y");
                expand_env_in_value(&mut v);
                let s = v.as_str().unwrap();
                assert!(s.starts_with("x=") && s.ends_with("-y") && s.contains("${"));
            },
        );
    }

    #[test]
    fn unresolved_placeholder_is_not_a_key() {
        let section = LlmSection {
            api_key: Some("${GIRI_T_NEVER_SET}".into()),
            ..Default::default()
        };
        assert_eq!(section.resolved_api_key(), None);

        let section = LlmSection {
            api_key: Some("  AIza-abc  ".into()),
            ..Default::default()
        };
        assert_eq!(section.resolved_api_key().as_deref(), Some("AIza-abc"));
    }

    #[test]
    fn missing_key_falls_back_to_provider_env() {
        temp_env::with_var("OPENAI_API_KEY", Some("sk-env"), || {
            let section = LlmSection {
                provider: ProviderKind::OpenAi,
                ..Default::default()
            };
            assert_eq!(section.resolved_api_key().as_deref(), Some("sk-env"));
            assert_eq!(section.to_llm_config().model, "gpt-4o-mini");
        });
    }

    #[test]
    fn blank_model_uses_provider_default() {
        let section = LlmSection {
            model: Some("  ".into()),
            endpoint: Some(String::new()),
            ..Default::default()
        };
        let cfg = section.to_llm_config();
        assert_eq!(cfg.model, "gemini-pro");
        assert_eq!(cfg.endpoint, None);
    }
}
