use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::phrase::EmptyListPolicy;
use crate::wordlist::suggest::DEFAULT_SUGGESTION_LIMIT;

/// Hex colour overrides (`#RRGGBB` or `#RGB`), applied on top of the default theme
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ThemeColors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_dim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive: Option<String>,
}

fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Newline-delimited word list; the bundled BIP-39 English list when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordlist_path: Option<PathBuf>,

    /// Maximum suggestions shown under a slot
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Send a desktop notification with the submission result
    #[serde(default)]
    pub notifications: bool,

    /// Refuse submissions while the word list is empty
    #[serde(default)]
    pub reject_without_wordlist: bool,

    #[serde(default)]
    pub theme: ThemeColors,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wordlist_path: None,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            notifications: false,
            reject_without_wordlist: false,
            theme: ThemeColors::default(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("seedcheck");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, or create it
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(_) => Ok(AppConfig::default()),
        }
    }

    /// Load config from `path`. A missing file is created with defaults;
    /// an unreadable one is reported and replaced by defaults in memory.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => return Ok(config.normalized()),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save_to(path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&self.clone().normalized())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn normalized(mut self) -> Self {
        self.suggestion_limit = self.suggestion_limit.max(1);
        // Treat `wordlist_path = ""` as unset
        if self
            .wordlist_path
            .as_ref()
            .map(|p| p.as_os_str().is_empty())
            .unwrap_or(false)
        {
            self.wordlist_path = None;
        }
        self
    }

    pub fn empty_list_policy(&self) -> EmptyListPolicy {
        if self.reject_without_wordlist {
            EmptyListPolicy::Reject
        } else {
            EmptyListPolicy::Vacuous
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            wordlist_path: Some(PathBuf::from("/usr/share/bip39/english.txt")),
            suggestion_limit: 8,
            notifications: true,
            reject_without_wordlist: true,
            theme: ThemeColors {
                accent: Some("#ffc107".to_string()),
                ..Default::default()
            },
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config.wordlist_path, deserialized.wordlist_path);
        assert_eq!(deserialized.suggestion_limit, 8);
        assert!(deserialized.notifications);
        assert_eq!(deserialized.theme, config.theme);
        assert_eq!(deserialized.empty_list_policy(), EmptyListPolicy::Reject);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str("notifications = true\n").unwrap();
        assert_eq!(config.suggestion_limit, DEFAULT_SUGGESTION_LIMIT);
        assert!(config.wordlist_path.is_none());
        assert_eq!(config.empty_list_policy(), EmptyListPolicy::Vacuous);
    }

    #[test]
    fn test_load_from_creates_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.suggestion_limit, DEFAULT_SUGGESTION_LIMIT);
        assert!(path.exists());
    }

    #[test]
    fn test_load_from_normalizes_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "suggestion_limit = 0\nwordlist_path = \"\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.suggestion_limit, 1);
        assert!(config.wordlist_path.is_none());
    }

    #[test]
    fn test_load_from_bad_toml_falls_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "suggestion_limit = \"many\"").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.suggestion_limit, DEFAULT_SUGGESTION_LIMIT);
    }
}
