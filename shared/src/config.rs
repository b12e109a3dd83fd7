use crate::pagination::PaginationConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("api_base_url must not be empty")]
    EmptyBaseUrl,
    #[error("default_page_size {0} is not one of the page size options")]
    PageSizeNotOffered(u64),
    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Client settings, read from an optional JSON document at start-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub default_page_size: u64,
    pub page_size_options: Vec<u64>,
    pub flash_duration_ms: u32,
    pub max_note_length: usize,
    pub max_tag_name_length: usize,
    pub currency_symbol: String,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let pagination = PaginationConfig::default();
        Self {
            api_base_url: "/api".to_string(),
            default_page_size: pagination.default_page_size,
            page_size_options: pagination.page_size_options,
            flash_duration_ms: 3000,
            max_note_length: 1000,
            max_tag_name_length: 100,
            currency_symbol: "¥".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !self.page_size_options.contains(&self.default_page_size) {
            return Err(ConfigError::PageSizeNotOffered(self.default_page_size));
        }
        if self.log_level_filter().is_none() {
            return Err(ConfigError::UnknownLogLevel(self.log_level.clone()));
        }
        Ok(())
    }

    pub fn log_level_filter(&self) -> Option<log::LevelFilter> {
        self.log_level.parse().ok()
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn pagination(&self) -> PaginationConfig {
        PaginationConfig {
            default_page_size: self.default_page_size,
            page_size_options: self.page_size_options.clone(),
            ..PaginationConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "/api");
        assert_eq!(config.default_page_size, 50);
        assert!(config.validate().is_ok());
        assert_eq!(config.log_level_filter(), Some(log::LevelFilter::Info));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ClientConfig::from_json(r#"{"api_base_url": "https://books.example/api/"}"#).unwrap();
        assert_eq!(config.base_url(), "https://books.example/api");
        assert_eq!(config.flash_duration_ms, 3000);
        assert_eq!(config.pagination().max_pages, 5);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClientConfig {
            api_base_url: "  ".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyBaseUrl));

        config.api_base_url = "/api".to_string();
        config.default_page_size = 30;
        assert_eq!(config.validate(), Err(ConfigError::PageSizeNotOffered(30)));

        config.default_page_size = 20;
        config.log_level = "chatty".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::UnknownLogLevel(_))));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(ClientConfig::from_json("{not json").is_err());
    }
}
