use rusqlite::Connection;
use std::path::PathBuf;
use timetracking::infra::app_config::{config_path, load_or_init};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run()
}

fn database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(path) = std::env::var("TIMETRACKING_DB_PATH") {
        return Ok(PathBuf::from(path));
    }
    let config = load_or_init(&config_path(None))?;
    Ok(config.resolved_database_file())
}

fn count(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = database_path()?;

    // Check if database exists
    if !db_path.exists() {
        println!("Database does not exist at: {}", db_path.display());
        println!("No reset needed.");
        return Ok(());
    }

    println!("Connecting to database at: {}", db_path.display());

    let conn = Connection::open(&db_path)?;

    let tables_exist: i32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('project', 'record')",
        [],
        |row| row.get(0),
    )?;

    if tables_exist < 2 {
        println!("Tables do not exist. No reset needed.");
        return Ok(());
    }

    println!("Current record counts:");
    println!("  Projects: {}", count(&conn, "project")?);
    println!("  Recordings: {}", count(&conn, "record")?);

    conn.execute("DELETE FROM record", [])?;
    println!("Cleared record table");

    conn.execute("DELETE FROM project", [])?;
    println!("Cleared project table");

    let projects_after = count(&conn, "project")?;
    let recordings_after = count(&conn, "record")?;

    println!("\nAfter reset:");
    println!("  Projects: {}", projects_after);
    println!("  Recordings: {}", recordings_after);

    if projects_after == 0 && recordings_after == 0 {
        println!("\nDatabase successfully reset! All records have been deleted.");
    } else {
        eprintln!("\nWarning: Some records still exist in the database.");
    }

    println!("Database location: {}", db_path.display());

    Ok(())
}
