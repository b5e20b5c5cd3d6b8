//! Config - Application Configuration

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_ISSUE_BASE_URL, DEFAULT_PAGE_SIZE, REQUEST_TIMEOUT_SECS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// REST endpoints
    pub api: ApiConfig,
    /// Table defaults
    pub view: ViewConfig,
    /// Log output
    pub logging: LoggingConfig,
}

/// REST endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Budget REST API root, e.g. `http://host/jira/rest/budget/1.0`
    pub base_url: String,
    /// Issue tracker REST API root, e.g. `http://host/jira/rest/api/2`
    pub issue_base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            issue_base_url: DEFAULT_ISSUE_BASE_URL.to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Table defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    /// Rows per page for newly created tables
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Also write daily-rolling log files
    pub file: bool,
    /// Log directory; the data directory when unset
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: false,
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://jira.example.com/rest/budget/1.0"

            [view]
            page_size = 10
            "#,
        )
        .expect("parse");
        assert_eq!(config.api.base_url, "https://jira.example.com/rest/budget/1.0");
        assert_eq!(config.api.timeout_secs, REQUEST_TIMEOUT_SECS);
        assert_eq!(config.view.page_size, 10);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn empty_toml_is_default() {
        let config: AppConfig = toml::from_str("").expect("parse");
        assert_eq!(config, AppConfig::default());
    }
}
