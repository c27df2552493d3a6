// src/config.rs
// Application configuration: optional YAML file, then environment overrides

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{JugaadError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "campus_jugaad.yaml";
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Without a key every chat reply comes from the offline responder.
    pub api_key: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CHAT_MODEL.to_string(),
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            timeout_secs: 20,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub starting_balance: i64,
    pub chat: ChatConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./db/campus_jugaad.db"),
            log_dir: PathBuf::from("./logs"),
            starting_balance: 450,
            chat: ChatConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads `CAMPUS_CONFIG` (or the default path) if present and applies env overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CAMPUS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(raw)
            .map_err(|e| JugaadError::Config(e.to_string()))?;

        if config.starting_balance < 0 {
            return Err(JugaadError::Config(
                "starting_balance must not be negative".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.chat.api_key = Some(key);
        }
        if let Some(path) = lookup("CAMPUS_DB_PATH").filter(|p| !p.trim().is_empty()) {
            self.db_path = PathBuf::from(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.starting_balance, 450);
        assert_eq!(config.chat.model, "gemini-2.5-flash");
        assert!(config.chat.api_key.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("starting_balance: 1000\nchat:\n  timeout_secs: 5\n").unwrap();
        assert_eq!(config.starting_balance, 1000);
        assert_eq!(config.chat.timeout_secs, 5);
        assert_eq!(config.chat.model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
    }

    #[test]
    fn test_negative_balance_rejected() {
        let err = AppConfig::from_yaml("starting_balance: -5\n").unwrap_err();
        assert!(matches!(err, JugaadError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("GEMINI_API_KEY", "secret"),
            ("CAMPUS_DB_PATH", "/tmp/other.db"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.chat.api_key.as_deref(), Some("secret"));
        assert_eq!(config.db_path, PathBuf::from("/tmp/other.db"));
    }

    #[test]
    fn test_blank_key_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(|name| (name == "GEMINI_API_KEY").then(|| "  ".to_string()));
        assert!(config.chat.api_key.is_none());
    }
}
