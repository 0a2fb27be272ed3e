//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use paymail_core::models::config::PaymailConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paymail")
        .join("config.json")
}

/// Load configuration from an explicit path, else from the default
/// location if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PaymailConfig> {
    if let Some(path) = config_path {
        return Ok(PaymailConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(PaymailConfig::from_file(&default_path)?)
    } else {
        Ok(PaymailConfig::default())
    }
}
