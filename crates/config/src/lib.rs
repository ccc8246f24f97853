pub mod schema;
pub mod watcher;

pub use schema::{ConfigIssue, Overrides, Settings, TrayConfig, DEFAULT_UPDATE_INTERVAL};
pub use watcher::ConfigWatcher;

use batt_core::{BattError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `TrayConfig::default()` if
/// the file doesn't exist so the tray always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<TrayConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(TrayConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| BattError::Config(format!("cannot read '{}': {e}", path.display())))?;

    toml::from_str(&raw).map_err(|e| BattError::Config(format!("TOML parse error: {e}")))
}

/// Load `path`, apply command-line `overrides` and validate the result.
///
/// Every value that had to be reset is logged as a warning; a broken file
/// falls back to defaults (plus overrides) rather than aborting.
pub fn resolve(path: impl AsRef<Path>, overrides: &Overrides) -> Settings {
    let mut config = load(path).unwrap_or_else(|e| {
        tracing::warn!("{e}; using defaults.");
        TrayConfig::default()
    });
    config.apply(overrides);

    let (settings, issues) = config.validate();
    for issue in &issues {
        tracing::warn!("{issue}");
    }
    settings
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("batticon").join("batticon.toml")
}
