use folio_ai::AiSettings;
use folio_editor::AutosaveConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Folio configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding projects.json and assets.json
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default)]
    pub autosave: AutosaveConfig,

    #[serde(default)]
    pub ai: AiSettings,
}

fn default_data_dir() -> String {
    ".folio".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), data_dir = %config.data_dir, "Loaded config");
            Ok(config)
        } else {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            Ok(Config::default())
        }
    }

    /// Get absolute path to the data directory
    pub fn get_data_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.data_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            autosave: AutosaveConfig::default(),
            ai: AiSettings::default(),
        }
    }
}
