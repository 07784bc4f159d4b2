//! SQLite database setup and connection management for the time tracker.
//! Opens the store named by the configuration and makes sure the schema exists.

use super::repository::{DbConn, SqliteRepository};
use crate::infra::app_config::AppConfig;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Storage drivers understood by [`Database::open`].
pub const SUPPORTED_DRIVERS: &[&str] = &["sqlite", "sqlite3"];

/// Database wrapper that owns the process-wide SQLite connection.
pub struct Database {
    conn: DbConn,
}

impl Database {
    /// Open the store described by the configuration.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let driver = config.database_driver.trim().to_lowercase();
        if !SUPPORTED_DRIVERS.contains(&driver.as_str()) {
            bail!(
                "Unsupported database driver '{}' (supported: {})",
                config.database_driver,
                SUPPORTED_DRIVERS.join(", ")
            );
        }
        Self::open_at(config.resolved_database_file())
    }

    /// Create an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    /// Create or open the database at a specific path
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        log::debug!("Opened database at {}", path.display());
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.repository()
            .migrate()
            .context("Failed to create database schema")?;
        Ok(db)
    }

    /// Get a handle to the connection
    pub fn connection(&self) -> DbConn {
        self.conn.clone()
    }

    pub fn repository(&self) -> SqliteRepository {
        SqliteRepository::new(self.connection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_open_rejects_unknown_driver() {
        let config = AppConfig {
            database_driver: "postgres".into(),
            database_file: PathBuf::from("unused.db"),
        };
        let err = Database::open(&config).err().expect("driver rejected");
        assert!(err.to_string().contains("postgres"));
    }

    #[test]
    fn test_open_in_memory_creates_schema() -> anyhow::Result<()> {
        let db = Database::open_in_memory()?;
        let conn = db.connection();
        let conn = conn.lock().unwrap();
        let tables: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('project', 'record')",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(tables, 2);
        Ok(())
    }
}
