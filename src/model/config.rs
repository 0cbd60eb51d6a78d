use serde::{Deserialize, Serialize};

/// Default storage key for the persisted record
pub const DEFAULT_STORAGE_KEY: &str = "dashboard_data";

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted record (default: XDG data dir)
    #[serde(default)]
    pub data_dir: Option<String>,
    /// Key the record is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: None,
            key: default_key(),
        }
    }
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Seed sample projects when no record exists yet
    #[serde(default = "default_true")]
    pub sample_data: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig { sample_data: true }
    }
}

fn default_true() -> bool {
    true
}
