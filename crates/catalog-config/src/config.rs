use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    /// Quiet window before a typed query is written to the search log
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_min_logged_query_len")]
    pub min_logged_query_len: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Overrides the local store directory (defaults to `<data dir>/store`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// When set, logs go to this file (rotated daily) instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_per_page() -> usize {
    10
}

fn default_search_debounce_ms() -> u64 {
    600
}

fn default_min_logged_query_len() -> usize {
    2
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            search_debounce_ms: default_search_debounce_ms(),
            min_logged_query_len: default_min_logged_query_len(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults when it doesn't exist yet
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(anyhow::anyhow!("api.base_url is required and cannot be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "api.base_url must start with http:// or https:// (got {})",
                base_url
            ));
        }
        if self.ui.per_page == 0 {
            return Err(anyhow::anyhow!("ui.per_page must be greater than zero"));
        }
        if self.ui.min_logged_query_len == 0 {
            return Err(anyhow::anyhow!("ui.min_logged_query_len must be at least 1"));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api.base_url.trim().trim_end_matches('/')
    }

    /// Set a single value by its dotted key, as used by `reelbase config set`
    pub fn set_value(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "api.base_url" => self.api.base_url = value.trim().to_string(),
            "ui.per_page" => self.ui.per_page = parse_number(key, value)?,
            "ui.search_debounce_ms" => self.ui.search_debounce_ms = parse_number(key, value)?,
            "ui.min_logged_query_len" => self.ui.min_logged_query_len = parse_number(key, value)?,
            "storage.dir" => self.storage.dir = non_empty_path(value),
            "logging.file" => self.logging.file = non_empty_path(value),
            _ => return Err(anyhow::anyhow!("Unknown config key: {}", key)),
        }
        self.validate()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> anyhow::Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| anyhow::anyhow!("{} expects a number, got '{}'", key, value))
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.api.base_url = "https://catalog.example.com".to_string();
        config.ui.per_page = 25;

        config.save_to_file(file.path()).unwrap();

        let loaded = Config::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.api.base_url, "https://catalog.example.com");
        assert_eq!(loaded.ui.per_page, 25);
        assert_eq!(loaded.ui.search_debounce_ms, 600);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[ui]\nper_page = 5\n").unwrap();
        assert_eq!(config.ui.per_page, 5);
        assert_eq!(config.ui.min_logged_query_len, 2);
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
        assert!(config.storage.dir.is_none());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.api.base_url = "catalog.example.com".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "http://localhost:5000/".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_base(), "http://localhost:5000");

        config.ui.per_page = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::default();
        config.set_value("ui.per_page", "20").unwrap();
        config.set_value("storage.dir", "/tmp/store").unwrap();
        assert_eq!(config.ui.per_page, 20);
        assert_eq!(config.storage.dir, Some(PathBuf::from("/tmp/store")));

        assert!(config.set_value("ui.per_page", "lots").is_err());
        assert!(config.set_value("ui.colour", "blue").is_err());

        config.set_value("storage.dir", "").unwrap();
        assert!(config.storage.dir.is_none());
    }
}
