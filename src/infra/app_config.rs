use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DRIVER: &str = "sqlite";
pub const DEFAULT_DATABASE_FILE: &str = "timetracking.db";
pub const CONFIG_FILE_NAME: &str = "app_config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub database_driver: String,
    pub database_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_driver: DEFAULT_DRIVER.to_string(),
            database_file: PathBuf::from(DEFAULT_DATABASE_FILE),
        }
    }
}

impl AppConfig {
    /// Database file with a leading `~` expanded to the home directory.
    pub fn resolved_database_file(&self) -> PathBuf {
        match self.database_file.strip_prefix("~") {
            Ok(rest) => home::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| self.database_file.clone()),
            Err(_) => self.database_file.clone(),
        }
    }

    /// Replace blank values with their defaults. Returns whether anything
    /// changed.
    fn fill_defaults(&mut self) -> bool {
        let defaults = Self::default();
        let mut changed = false;
        if self.database_driver.trim().is_empty() {
            self.database_driver = defaults.database_driver;
            changed = true;
        }
        if self.database_file.as_os_str().is_empty() {
            self.database_file = defaults.database_file;
            changed = true;
        }
        changed
    }
}

/// Read the configuration at `path`, creating it with defaults when it
/// does not exist yet. Blank values are filled in and written back.
pub fn load_or_init(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        let config = AppConfig::default();
        save_config(&config, path)?;
        log::info!("Created configuration file {}", path.display());
        return Ok(config);
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Malformed configuration file {}", path.display()))?;
    if config.fill_defaults() {
        save_config(&config, path)?;
        log::info!("Updated configuration file {}", path.display());
    }
    Ok(config)
}

pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Where the configuration lives: an explicit path wins, then
/// `TIMETRACKING_CONFIG_PATH`, then `app_config.toml` in the working
/// directory.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("TIMETRACKING_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}
