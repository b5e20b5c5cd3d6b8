//! Application Constants
//!
//! Centralized defaults shared by the table engine, services and config.

/// Rows per page when a view is first created
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Minimum search term length before issue search hits the network
pub const ISSUE_SEARCH_MIN_LEN: usize = 2;

/// Upper bound on issues returned by one search
pub const ISSUE_SEARCH_MAX_RESULTS: usize = 20;

/// Request timeout
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Budget REST API root
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:2990/jira/rest/budget/1.0";

/// Issue tracker REST API root
pub const DEFAULT_ISSUE_BASE_URL: &str = "http://localhost:2990/jira/rest/api/2";

/// Application identity for platform directories
pub const APP_QUALIFIER: &str = "com";
pub const APP_ORGANIZATION: &str = "budgetview";
pub const APP_NAME: &str = "budget-view";

/// Config file names inside the config directory
pub const CONFIG_FILE_NAME: &str = "budget-view.toml";
pub const SELECTION_FILE_NAME: &str = "selection.toml";

/// Log file prefix for the rolling file appender
pub const LOG_FILE_PREFIX: &str = "budget-view.log";

/// How long the CLI waits for outstanding fetches
pub const EVENT_DRAIN_TIMEOUT_MS: u64 = 20_000;

/// Predefined expense categories; anything else is a custom category
pub const PREDEFINED_CATEGORIES: [&str; 4] = ["Software", "Hardware", "Labor", "Miscellaneous"];
