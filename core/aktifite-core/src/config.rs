//! App preferences loading and saving.
//!
//! Missing or unreadable config falls back to defaults; a broken config file
//! must never stop the app from starting.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{write_json, StorageConfig};
use crate::types::{City, Sport};

/// Tunables for the activity form and the local driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Used when a create-activity form leaves the participant cap unset.
    pub default_max_participants: u32,
    /// Inclusive lower bound of the participant cap.
    pub min_participants: u32,
    /// Inclusive upper bound of the participant cap.
    pub max_participants: u32,
    pub default_sport: Sport,
    pub default_city: City,
    /// Mirror log output into `<root>/logs`.
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_max_participants: 2,
            min_participants: 2,
            max_participants: 50,
            default_sport: Sport::Tenis,
            default_city: City::Ankara,
            log_to_file: false,
        }
    }
}

impl AppConfig {
    /// Resolves a requested cap: zero means "use the default", anything else
    /// is clamped into `[min_participants, max_participants]`.
    pub fn resolve_max_participants(&self, requested: u32) -> u32 {
        let requested = if requested == 0 {
            self.default_max_participants
        } else {
            requested
        };
        let low = self.min_participants.min(self.max_participants);
        requested.clamp(low, self.max_participants.max(low))
    }
}

/// Loads the app config, returning defaults if the file is missing or corrupt.
pub fn load_config(storage: &StorageConfig) -> AppConfig {
    let path = storage.config_file();
    let content = match fs_err::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return AppConfig::default(),
    };
    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, path = %path.display(), "Malformed config; using defaults");
            AppConfig::default()
        }
    }
}

/// Saves the app config to disk.
pub fn save_config(storage: &StorageConfig, config: &AppConfig) -> Result<()> {
    write_json(&storage.config_file(), config)
}
