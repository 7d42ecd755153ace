use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

const APP_DIR: &str = "newspalette";
const NEWS_API_KEY_ENV: &str = "NEWSPALETTE_NEWS_API_KEY";
const AUTH_API_KEY_ENV: &str = "NEWSPALETTE_AUTH_API_KEY";

/// How `save_preferences` writes a user's category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceWriteMode {
    /// Replace the user's single record, creating it if missing.
    #[default]
    Upsert,
    /// Insert a new row on every save.
    Append,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_news_api_url")]
    pub news_api_url: String,
    pub news_api_key: Option<String>,

    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_search_country")]
    pub search_country: String,

    #[serde(default = "default_headline_limit")]
    pub headline_limit: u32,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    #[serde(default)]
    pub auth_url: String,
    pub auth_api_key: Option<String>,

    #[serde(default)]
    pub preference_write: PreferenceWriteMode,

    #[serde(default = "default_true")]
    pub annotate_sentiment: bool,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("newspalette.db").to_string_lossy().to_string()
}

fn default_news_api_url() -> String {
    "https://gnews.io/api/v4".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_country() -> String {
    "us".to_string()
}

fn default_search_country() -> String {
    "any".to_string()
}

fn default_headline_limit() -> u32 {
    12
}

fn default_search_limit() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            news_api_url: default_news_api_url(),
            news_api_key: None,
            language: default_language(),
            country: default_country(),
            search_country: default_search_country(),
            headline_limit: default_headline_limit(),
            search_limit: default_search_limit(),
            auth_url: String::new(),
            auth_api_key: None,
            preference_write: PreferenceWriteMode::default(),
            annotate_sentiment: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Reads `path`, writing the defaults there first if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str::<Config>(&content)?
        } else {
            let config = Config::default();
            config.save_to(path)?;
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(NEWS_API_KEY_ENV) {
            self.news_api_key = Some(key);
        }
        if let Ok(key) = std::env::var(AUTH_API_KEY_ENV) {
            self.auth_api_key = Some(key);
        }
    }

    /// Fails early when the services the client cannot run without are unset.
    pub fn validate(&self) -> Result<()> {
        if self.news_api_key.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::Config(format!(
                "news_api_key is not set; add it to {} or export {}",
                Self::config_path().display(),
                NEWS_API_KEY_ENV
            )));
        }
        if self.auth_url.is_empty() {
            return Err(AppError::Config(format!(
                "auth_url is not set; add it to {}",
                Self::config_path().display()
            )));
        }
        Ok(())
    }
}
