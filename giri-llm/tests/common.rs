use std::sync::OnceLock;

use giri_common::observability::{LogConfig, LogFormat};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

#[allow(dead_code)]
pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let dir = std::env::temp_dir().join("giri-tests");
        let config = LogConfig {
            app_name: "giri-tests",
            log_dir: Some(dir),
            emit_stderr: true,
            format: LogFormat::from_name(&std::env::var("GIRI_LOG_FORMAT").unwrap_or_default()),
            default_filter: "debug".to_string(),
        };

        giri_common::observability::init_logging(config).unwrap_or_default()
    });
}
