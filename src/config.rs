use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Application-level constants
pub const APP_NAME: &str = "LabLens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Overrides the registry file path.
pub const REGISTRY_ENV: &str = "LABLENS_REGISTRY";
/// Log filter directives, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "LABLENS_LOG";

const REGISTRY_FILE: &str = "benchmarks.json";
const PIPELINE_CONFIG_FILE: &str = "pipeline.json";

/// Per-user configuration directory (`~/.config/lablens` on Linux).
/// `None` when the platform has no notion of one.
pub fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME.to_lowercase()))
}

/// Per-user registry override, if the platform has a config directory.
pub fn user_registry_path() -> Option<PathBuf> {
    app_config_dir().map(|dir| dir.join(REGISTRY_FILE))
}

/// Per-user pipeline configuration, if the platform has a config directory.
pub fn user_pipeline_config_path() -> Option<PathBuf> {
    app_config_dir().map(|dir| dir.join(PIPELINE_CONFIG_FILE))
}

/// Default log filter: crate at info, everything else at warn.
pub fn default_log_filter() -> String {
    "warn,lablens=info,lablens_lib=info".to_string()
}

/// Install the global tracing subscriber. Logs go to stderr so stdout stays
/// clean for report JSON. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| {
            if verbose {
                EnvFilter::new("info,lablens=debug,lablens_lib=debug")
            } else {
                EnvFilter::new(default_log_filter())
            }
        });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
