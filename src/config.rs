use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PopularError, Result};
use crate::types::{CategoryKey, ALL_LANGUAGES, DEFAULT_LANGUAGES};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub default_language: String,
    pub languages: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_language: ALL_LANGUAGES.to_string(),
            languages: DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_url: String,
    /// Left to the API's default page size when unset.
    pub per_page: Option<u32>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            per_page: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub loading_label: String,
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            loading_label: "Fetching Repos".to_string(),
            tick_rate_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub github: GitHubConfig,
    pub ui: UiConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("popular").join("config.toml"))
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        if !path.exists() {
            return Config::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring config: {}", e);
                Config::default()
            }
        }
    }

    /// Load from an explicit path. Errors are returned, not swallowed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| PopularError::Config(e.to_string()))?;
        if config.general.languages.is_empty() {
            config.general.languages = GeneralConfig::default().languages;
        }
        Ok(config)
    }

    pub fn languages(&self) -> Vec<CategoryKey> {
        self.general
            .languages
            .iter()
            .map(|l| CategoryKey::new(l.as_str()))
            .collect()
    }

    pub fn default_language(&self) -> CategoryKey {
        CategoryKey::new(self.general.default_language.as_str())
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms.max(50))
    }
}
