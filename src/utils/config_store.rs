//! ConfigStore - Local Configuration Storage
//!
//! TOML files under the configuration directory. A missing file is created
//! empty and an empty file means defaults.

use crate::constants::{CONFIG_FILE_NAME, SELECTION_FILE_NAME};
use crate::domain::AppConfig;
use crate::error::Result;
use crate::helpers::{ensure_file, get_or_create_config_dir};
use crate::state::SelectionStore;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info};

/// Read a TOML file, falling back to defaults when it is empty
pub fn try_load<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let value = fs::read_to_string(path)?;
    if value.trim().is_empty() {
        return Ok(T::default());
    }

    let parsed = toml::from_str(&value).map_err(|e| {
        error!(error = %e, path = ?path, "Failed to parse config file");
        e
    })?;
    Ok(parsed)
}

pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = toml::to_string_pretty(value)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn get_config_path() -> Result<PathBuf> {
    ensure_file(&get_or_create_config_dir()?, CONFIG_FILE_NAME)
}

/// Load the application configuration from the configuration directory
pub fn load_config() -> Result<AppConfig> {
    let path = get_config_path()?;
    info!(path = ?path, "Loading config file");
    try_load(&path)
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    save(&get_config_path()?, config)
}

// ==================== Project Selection ====================

#[derive(Debug, Default, Serialize, Deserialize)]
struct Selection {
    project: Option<String>,
}

/// Selected project kept in its own TOML file
#[derive(Debug, Clone)]
pub struct FileSelectionStore {
    path: PathBuf,
}

impl FileSelectionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store in the configuration directory
    pub fn open_default() -> Result<Self> {
        let path = ensure_file(&get_or_create_config_dir()?, SELECTION_FILE_NAME)?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SelectionStore for FileSelectionStore {
    fn load_selection(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let selection: Selection = try_load(&self.path)?;
        Ok(selection.project.filter(|key| !key.is_empty()))
    }

    fn save_selection(&self, key: &str) -> Result<()> {
        save(
            &self.path,
            &Selection {
                project: Some(key.to_string()),
            },
        )
    }
}

/// Selection held in memory only
#[derive(Debug, Default)]
pub struct MemorySelectionStore {
    project: Mutex<Option<String>>,
}

impl MemorySelectionStore {
    pub fn new(project: Option<&str>) -> Self {
        Self {
            project: Mutex::new(project.map(str::to_string)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.project
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SelectionStore for MemorySelectionStore {
    fn load_selection(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save_selection(&self, key: &str) -> Result<()> {
        *self.slot() = Some(key.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::ensure_dir;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("budget-view-cfg-{}", uuid::Uuid::new_v4()));
        ensure_dir(&dir).expect("dir")
    }

    #[test]
    fn empty_file_loads_defaults() {
        let dir = temp_dir();
        let path = ensure_file(&dir, CONFIG_FILE_NAME).expect("file");
        let config: AppConfig = try_load(&path).expect("load");
        assert_eq!(config, AppConfig::default());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn config_survives_save_and_load() {
        let dir = temp_dir();
        let path = dir.join(CONFIG_FILE_NAME);
        let mut config = AppConfig::default();
        config.view.page_size = 25;
        config.api.base_url = "http://budget.local/rest".to_string();
        save(&path, &config).expect("save");

        let loaded: AppConfig = try_load(&path).expect("load");
        assert_eq!(loaded, config);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = temp_dir();
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, "view = [").expect("write");
        assert!(try_load::<AppConfig>(&path).is_err());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn selection_store_remembers_project() {
        let dir = temp_dir();
        let store = FileSelectionStore::new(dir.join(SELECTION_FILE_NAME));
        assert_eq!(store.load_selection().expect("load"), None);

        store.save_selection("BUD").expect("save");
        assert_eq!(store.load_selection().expect("load"), Some("BUD".to_string()));
        let _ = fs::remove_dir_all(&dir);
    }
}
