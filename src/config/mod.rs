use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::history::HISTORY_DAYS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Whose completions and streak are tracked
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// SQLite file; defaults to the platform data dir
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Desktop notification when an act is completed
    #[serde(default)]
    pub notifications: bool,

    /// How many days back the history view reaches
    #[serde(default = "default_history_days")]
    pub history_days: u32,
}

fn default_user_id() -> String {
    std::env::var("USER")
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "default".to_string())
}

fn default_history_days() -> u32 {
    HISTORY_DAYS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            database_path: None,
            notifications: false,
            history_days: HISTORY_DAYS,
        }
    }
}

impl AppConfig {
    /// Directory holding config.toml and theme.conf
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("kindify");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir)
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, or create it
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Ok(path) => Ok(Self::load_from(&path)),
            Err(_) => Ok(AppConfig::default()),
        }
    }

    /// Load config from `path`. A missing file is created with defaults; an
    /// unreadable or unparsable one is left alone and defaults are used.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            let config = AppConfig::default();
            if let Err(e) = config.save_to(path) {
                tracing::warn!("Could not write default config: {}", e);
            }
            return config;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read config: {}", e);
                return AppConfig::default();
            }
        };

        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => config.normalized(),
            Err(e) => {
                tracing::warn!("Failed to parse config: {}", e);
                AppConfig::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&self.clone().normalized())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace values that would leave the app unusable
    fn normalized(mut self) -> Self {
        // An empty window would hide everything
        if self.history_days == 0 {
            self.history_days = HISTORY_DAYS;
        }
        if self.user_id.trim().is_empty() {
            self.user_id = default_user_id();
        }
        self
    }

    /// Resolved database location
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join("kindify").join("kindify.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            user_id: "alice".to_string(),
            database_path: Some(PathBuf::from("/tmp/kindify.db")),
            notifications: true,
            history_days: 14,
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(deserialized.user_id, "alice");
        assert_eq!(deserialized.database_path, config.database_path);
        assert!(deserialized.notifications);
        assert_eq!(deserialized.history_days, 14);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("user_id = \"bob\"").unwrap();

        assert_eq!(config.user_id, "bob");
        assert_eq!(config.history_days, HISTORY_DAYS);
        assert!(!config.notifications);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_from(&path);
        assert_eq!(config.history_days, HISTORY_DAYS);
        assert!(path.exists());
    }

    #[test]
    fn test_garbage_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "history_days = \"lots\"").unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.history_days, HISTORY_DAYS);
        // The user's file is kept so they can fix it
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "history_days = \"lots\"");
    }

    #[test]
    fn test_load_repairs_unusable_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "user_id = \"  \"\nhistory_days = 0\nnotifications = true\n").unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.history_days, HISTORY_DAYS);
        assert!(!config.user_id.trim().is_empty());
        assert!(config.notifications);
    }

    #[test]
    fn test_save_repairs_zero_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = AppConfig {
            history_days: 0,
            ..AppConfig::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).history_days, HISTORY_DAYS);
    }
}
