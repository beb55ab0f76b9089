//! Application configuration management.
//!
//! Configuration is stored at `~/.config/airboard/config.json` and covers the
//! lookup service location, the refresh period and the cache directory. The
//! list of airlines on the board is compiled in (`AIRLINE_CODES`).
//!
//! `AIRBOARD_API_URL` and `AIRBOARD_CACHE_DIR` override the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "airboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default refresh period of the synchronizer, in seconds.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 10;

/// Environment variable overriding `api_base_url`
pub const ENV_API_URL: &str = "AIRBOARD_API_URL";

/// Environment variable overriding `cache_dir`
pub const ENV_CACHE_DIR: &str = "AIRBOARD_CACHE_DIR";

/// Airline lookup codes shown on the board, in display order.
pub const AIRLINE_CODES: [&str; 32] = [
    "AAL", "DAL", "UAL", "SWA", "JBU", "ASA", "FFT", "NKS", "QTR", "BAW", "KLM", "AFR", "QFA",
    "VIR", "ANZ", "SIA", "ANA", "CPA", "EVA", "THA", "JAL", "KAL", "MAS", "PAL", "AAR", "CXA",
    "CSN", "CEB", "SLK", "VJC", "EMR", "EMD",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_dir: None,
        }
    }
}

impl Config {
    /// Load the config file (defaults when absent), then apply environment
    /// overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(dir) = var(ENV_CACHE_DIR).filter(|v| !v.trim().is_empty()) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Refresh period, never shorter than one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn airline_codes(&self) -> Vec<String> {
        AIRLINE_CODES.iter().map(|code| code.to_string()).collect()
    }
}
