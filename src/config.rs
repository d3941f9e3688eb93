//! Configuration for the dashboard.
//!
//! Settings live in a small YAML file in the app data directory; the Gemini
//! API key can also arrive through the `GEMINI_API_KEY` environment variable,
//! which wins over the file so keys can stay out of it entirely.

use crate::ai::gemini::DEFAULT_MODEL;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config filename within the data directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Database filename within the data directory.
pub const DB_FILE_NAME: &str = "board.sqlite3";

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Path to the SQLite database. Defaults to the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    /// Gemini API key. Overridden by `GEMINI_API_KEY` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,

    /// Gemini model name. Defaults to the crate's pinned model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_model: Option<String>,
}

impl AppConfig {
    /// Load config from a data directory, returning defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_from(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, data_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(data_dir)?;
        let content = serde_yaml::to_string(self)?;
        std::fs::write(data_dir.join(CONFIG_FILE_NAME), content)?;
        Ok(())
    }

    /// The database path, defaulting into the given data directory.
    #[must_use]
    pub fn db_path(&self, data_dir: &Path) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| data_dir.join(DB_FILE_NAME))
    }

    /// The Gemini API key: environment first, then the config file.
    #[must_use]
    pub fn gemini_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()).or_else(|| {
            self.gemini_api_key.clone()
        })
    }

    /// The Gemini model to use.
    #[must_use]
    pub fn gemini_model(&self) -> String {
        self.gemini_model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }
}

/// Default application data directory (`~/.local/share/casa-gestao` or the
/// platform equivalent), falling back to the working directory.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from("."), |d| d.join("casa-gestao"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            db_path: Some(PathBuf::from("/tmp/board.sqlite3")),
            gemini_api_key: Some("chave".to_string()),
            gemini_model: Some("gemini-x".to_string()),
        };
        config.save_to(dir.path()).unwrap();
        let loaded = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_db_path_defaults_into_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        assert_eq!(config.db_path(dir.path()), dir.path().join(DB_FILE_NAME));
    }

    #[test]
    #[serial]
    fn test_env_key_wins_over_file() {
        let config = AppConfig { gemini_api_key: Some("do-arquivo".to_string()), ..Default::default() };

        std::env::remove_var(API_KEY_ENV);
        assert_eq!(config.gemini_api_key().as_deref(), Some("do-arquivo"));

        std::env::set_var(API_KEY_ENV, "do-ambiente");
        assert_eq!(config.gemini_api_key().as_deref(), Some("do-ambiente"));
        std::env::remove_var(API_KEY_ENV);
    }

    #[test]
    fn test_model_default() {
        assert_eq!(AppConfig::default().gemini_model(), DEFAULT_MODEL);
    }
}
