//! Repository implementation for data access.
//!
//! Provides CRUD and query operations for projects and recordings on top of
//! a shared SQLite connection. Every operation is a single statement; read
//! cursors are dropped before the method returns.

mod project;
mod recording;

use super::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Datelike, Duration, SecondsFormat, SubsecRound, TimeZone, Utc};
use rusqlite::Connection;
use rusqlite::types::Type;
use std::sync::{Arc, Mutex, MutexGuard};

pub type DbConn = Arc<Mutex<Connection>>;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS project (
        tag VARCHAR(20) PRIMARY KEY,
        name VARCHAR(50) NOT NULL,
        type VARCHAR(20) NOT NULL,
        status INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS record (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        projTag VARCHAR(20) NOT NULL,
        startTime DATETIME NOT NULL,
        endTime DATETIME,
        name VARCHAR(70) NOT NULL,
        billable BOOLEAN,
        note TEXT,
        status INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_record_proj_tag ON record(projTag);
    CREATE INDEX IF NOT EXISTS idx_record_start_time ON record(startTime);
"#;

/// Sole owner of persistent time-tracking state.
///
/// Constructed with the connection it operates on, so tests can hand it an
/// in-memory store.
#[derive(Clone)]
pub struct SqliteRepository {
    conn: DbConn,
}

impl SqliteRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Ensure the `project` and `record` tables exist. Safe to run on every
    /// startup.
    pub fn migrate(&self) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RepositoryError::Poisoned)
    }
}

/// Timestamps are stored as second-precision RFC 3339 UTC text so that
/// string comparison in SQL follows chronological order. That only holds
/// for four-digit years.
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

pub(crate) fn encode_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Truncate `time` to whole seconds, rejecting years the text encoding
/// cannot order.
pub(crate) fn storable_time(time: DateTime<Utc>) -> RepositoryResult<DateTime<Utc>> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&time.year()) {
        return Err(RepositoryError::InvalidArgument(format!(
            "timestamp out of range: {time}"
        )));
    }
    Ok(time.trunc_subsecs(0))
}

/// Smallest storable instant at or after `time`.
pub(crate) fn lower_bound(time: DateTime<Utc>) -> DateTime<Utc> {
    let whole = time.trunc_subsecs(0);
    let ceiled = if whole < time {
        whole.checked_add_signed(Duration::seconds(1)).unwrap_or(whole)
    } else {
        whole
    };
    clamp_time(ceiled)
}

/// Largest storable instant at or before `time`.
pub(crate) fn upper_bound(time: DateTime<Utc>) -> DateTime<Utc> {
    clamp_time(time.trunc_subsecs(0))
}

fn clamp_time(time: DateTime<Utc>) -> DateTime<Utc> {
    let limit = if time.year() > MAX_YEAR {
        Utc.with_ymd_and_hms(MAX_YEAR, 12, 31, 23, 59, 59)
    } else if time.year() < MIN_YEAR {
        Utc.with_ymd_and_hms(MIN_YEAR, 1, 1, 0, 0, 0)
    } else {
        return time;
    };
    limit.single().unwrap_or(time)
}

fn decode_time(index: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}
