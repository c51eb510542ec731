use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/app.json";

fn default_api_base() -> String {
    "http://localhost:5000".to_string()
}

fn default_routing_base() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_db_path() -> String {
    "data/client.db".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the backend REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Base URL of the external routing service.
    #[serde(default = "default_routing_base")]
    pub routing_base: String,
    /// Location of the on-device identity cache.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            routing_base: default_routing_base(),
            db_path: default_db_path(),
        }
    }
}

impl AppConfig {
    /// The realtime channel shares the REST host; only the scheme differs.
    pub fn realtime_base(&self) -> String {
        if let Some(rest) = self.api_base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.api_base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            format!("ws://{}", self.api_base)
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realtime_base_swaps_the_scheme() {
        let mut config = AppConfig::default();
        config.api_base = "http://192.168.1.20:5000".to_string();
        assert_eq!(config.realtime_base(), "ws://192.168.1.20:5000");

        config.api_base = "https://api.trike.example".to_string();
        assert_eq!(config.realtime_base(), "wss://api.trike.example");
    }

    #[test]
    fn saved_config_loads_back() {
        let path = std::env::temp_dir().join("trike-client-config-roundtrip.json");
        let path = path.to_str().unwrap();

        let mut config = AppConfig::default();
        config.api_base = "http://10.0.0.9:5000".to_string();
        save_config(path, &config).unwrap();

        let loaded = load_config(path);
        assert_eq!(loaded.api_base, "http://10.0.0.9:5000");
        assert_eq!(loaded.routing_base, default_routing_base());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"api_base": "http://10.0.0.5:5000"}"#).unwrap();
        assert_eq!(config.api_base, "http://10.0.0.5:5000");
        // Missing keys fall back to defaults rather than failing.
        assert_eq!(config.routing_base, default_routing_base());
        assert_eq!(config.db_path, default_db_path());
    }
}
