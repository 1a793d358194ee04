//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/cryptogrid/config.json`.
//! A missing or unreadable file is not an error for the application: it
//! logs the reason and runs with the compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "source": {
//!     "api_url": "https://api.coingecko.com/api/v3/simple/price",
//!     "assets": ["bitcoin", "ethereum", "solana"],
//!     "cache_window_secs": 30
//!   },
//!   "refresh": { "interval_secs": 30 },
//!   "widget": { "width": 400, "height": 420, "borderless": true }
//! }
//! ```

use crate::api::coingecko::DEFAULT_API_URL;
use crate::quote::DefaultQuoteTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where prices come from and how long they stay fresh.
    #[serde(default)]
    pub source: SourceConfig,

    /// Data timer settings.
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Window settings.
    #[serde(default)]
    pub widget: WidgetConfig,
}

/// Price source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// `/simple/price` endpoint.
    pub api_url: String,
    /// Asset ids requested in every batch.
    pub assets: Vec<String>,
    /// Minimum time between two network requests (s).
    pub cache_window_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            assets: DefaultQuoteTable::builtin().table().ids(),
            cache_window_secs: 30,
        }
    }
}

impl SourceConfig {
    pub fn cache_window(&self) -> Duration {
        Duration::from_secs(self.cache_window_secs)
    }
}

/// Data timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between two data timer ticks; also the countdown length.
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

impl RefreshConfig {
    /// The data timer interval, never shorter than one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// Window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub title: String,
    /// Initial width (px).
    pub width: i32,
    /// Initial height (px), including the countdown label.
    pub height: i32,
    /// Force the title bar off (`true`) or on (`false`).  Unset means the
    /// platform default.
    pub borderless: Option<bool>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            title: "Crypto Widget".to_string(),
            width: 400,
            height: 420,
            borderless: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
