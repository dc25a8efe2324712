//! Runtime configuration.
//!
//! Loaded from `~/.clientele/config.json`, overridable with the
//! `CLIENTELE_CONFIG` environment variable. The config carries the remote
//! API endpoint and token plus the directory for durable session state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the record API, e.g. `https://crm.example.com/api/v1`.
    pub api_base_url: String,
    /// Bearer token sent with every request.
    pub api_token: String,
    /// Directory holding session.json (the scope store backing file).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".clientele")
}

impl Config {
    /// Load config from `CLIENTELE_CONFIG` if set, else the default path.
    pub fn load() -> Result<Config, String> {
        let path = match std::env::var("CLIENTELE_CONFIG") {
            Ok(p) if !p.is_empty() => PathBuf::from(p),
            _ => default_data_dir().join("config.json"),
        };
        Self::load_from(&path)
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Config, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))
    }

    /// Path of the durable session store file.
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}
