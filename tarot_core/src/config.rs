//! Configuration file support for Tarot.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/tarot/config.toml`.

use crate::history::DEFAULT_MAX_ENTRIES;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    /// Settings file holding the daily card and the history log
    pub fn settings_path(&self) -> PathBuf {
        settings_path_in(&self.data_dir)
    }
}

/// Reading history configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Stored in place of an empty question
    #[serde(default = "default_question_placeholder")]
    pub question_placeholder: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            question_placeholder: default_question_placeholder(),
        }
    }
}

/// Settings file location inside a data directory
pub fn settings_path_in(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

// Default value functions
fn home_or_current_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_or_current_dir().join(".local/share"));
    base.join("tarot")
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_question_placeholder() -> String {
    "Sans question".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values the stores cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.history.max_entries == 0 {
            return Err(Error::Config("history.max_entries must be at least 1".into()));
        }
        if self.history.question_placeholder.trim().is_empty() {
            return Err(Error::Config(
                "history.question_placeholder must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_or_current_dir().join(".config"));
        base.join("tarot").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.history.max_entries, 100);
        assert_eq!(config.history.question_placeholder, "Sans question");
        assert!(config.data.data_dir.ends_with("tarot"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.history.max_entries, parsed.history.max_entries);
        assert_eq!(config.data.data_dir, parsed.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[history]
max_entries = 25
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.history.max_entries, 25);
        assert_eq!(config.history.question_placeholder, "Sans question"); // default
    }

    #[test]
    fn test_load_from_rejects_zero_cap() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[history]\nmax_entries = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_to_and_load_from() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.data.data_dir = temp_dir.path().join("data");
        config.history.question_placeholder = "Aucune question".into();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.data.data_dir, temp_dir.path().join("data"));
        assert_eq!(loaded.history.question_placeholder, "Aucune question");
        assert_eq!(
            loaded.data.settings_path(),
            temp_dir.path().join("data").join("settings.json")
        );
    }
}
