use giri_common::observability::LogFormat;
use giri_config::GiriConfigLoader;
use giri_llm::config::ProviderKind;
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn file_values_and_key_expansion() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
listings:
  url: https://mirror.example/store/udemy/
  cache_ttl_secs: 600
  timeout_secs: 15
llm:
  provider: openai
  model: gpt-4o
  api_key: "${GIRI_TEST_OPENAI_KEY}"
logging:
  format: json
  filter: giri=debug
"#;
    let p = write_yaml(&tmp, "giri.yaml", file_yaml);

    temp_env::with_var("GIRI_TEST_OPENAI_KEY", Some("sk-from-env"), || {
        let cfg = GiriConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load config");

        assert_eq!(cfg.listings.url, "https://mirror.example/store/udemy/");
        assert_eq!(cfg.listings.cache_ttl_secs, 600);
        assert_eq!(cfg.listings.timeout_secs, Some(15));
        assert_eq!(cfg.listings.user_agent, "Mozilla/5.0");
        assert_eq!(cfg.llm.provider, ProviderKind::OpenAi);
        assert_eq!(cfg.llm.to_llm_config().model, "gpt-4o");
        assert_eq!(cfg.llm.resolved_api_key().as_deref(), Some("sk-from-env"));
        assert_eq!(cfg.logging.log_format(), LogFormat::Json);
        assert_eq!(cfg.logging.filter, "giri=debug");
    });
}

#[test]
#[serial]
fn environment_overrides_files() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "giri.yaml", "listings:\n  max_items: 10\n");

    temp_env::with_vars(
        [
            ("GIRI__LISTINGS__MAX_ITEMS", Some("5")),
            ("GIRI__LLM__MODEL", Some("gemini-1.5-flash")),
        ],
        || {
            let cfg = GiriConfigLoader::new().with_file(&p).load().unwrap();
            assert_eq!(cfg.listings.max_items, 5);
            assert_eq!(cfg.llm.to_llm_config().model, "gemini-1.5-flash");
        },
    );
}

#[test]
#[serial]
fn missing_optional_file_is_fine_but_required_is_not() {
    let tmp = TempDir::new().unwrap();
    let absent = tmp.path().join("nope.yaml");

    let cfg = GiriConfigLoader::new()
        .with_optional_file(&absent)
        .load()
        .unwrap();
    assert_eq!(cfg.listings.max_items, 20);
    assert_eq!(cfg.listings.cache_ttl_secs, 3600);

    assert!(GiriConfigLoader::new().with_file(&absent).load().is_err());
}

#[test]
#[serial]
fn later_files_win() {
    let tmp = TempDir::new().unwrap();
    let base = write_yaml(&tmp, "base.yaml", "listings:\n  user_agent: Base/1.0\n  max_items: 8\n");
    let local = write_yaml(&tmp, "local.yaml", "listings:\n  user_agent: Local/2.0\n");

    let cfg = GiriConfigLoader::new()
        .with_file(base)
        .with_optional_file(local)
        .load()
        .unwrap();
    assert_eq!(cfg.listings.user_agent, "Local/2.0");
    assert_eq!(cfg.listings.max_items, 8);
}
