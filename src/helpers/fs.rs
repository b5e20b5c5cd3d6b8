//! File System Utilities
//!
//! Configuration and data directory management.

use crate::constants::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER};
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME).ok_or_else(|| Error::Invalid {
        message: "Could not determine project directories".to_string(),
    })
}

/// Create `dir` and its parents if missing
pub fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(dir.to_path_buf())
}

/// Get or create the application's configuration directory
///
/// Platform-specific locations:
/// - **Linux**: `~/.config/budget-view/` or `$XDG_CONFIG_HOME/budget-view/`
/// - **macOS**: `~/Library/Application Support/com.budgetview.budget-view/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\budgetview\budget-view\config\`
pub fn get_or_create_config_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.config_dir())
}

/// Get or create the data directory (logs, exported reports)
///
/// Platform-specific locations:
/// - **Linux**: `~/.local/share/budget-view/`
/// - **macOS**: `~/Library/Application Support/com.budgetview.budget-view/`
/// - **Windows**: `C:\Users\<User>\AppData\Roaming\budgetview\budget-view\data\`
pub fn get_or_create_data_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.data_dir())
}

/// Path of `file_name` inside `dir`, created empty when missing
pub fn ensure_file(dir: &Path, file_name: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    if !path.exists() {
        fs::write(&path, "")?;
    }
    Ok(path)
}

/// Check if running in development mode
pub fn is_development() -> bool {
    cfg!(debug_assertions)
}
