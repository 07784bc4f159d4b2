use chrono::{Datelike, Duration, Local, NaiveTime, TimeZone};
use std::path::PathBuf;
use timetracking::domain::{NewRecording, Project};
use timetracking::infra::app_config::{config_path, load_or_init};
use timetracking::infra::db::{Database, RepositoryError};
use timetracking::utils::{current_week, week_range};

// (tag, name, type)
const PROJECTS: &[(&str, &str, &str)] = &[
    ("DAG", "Dagobah", "development"),
    ("INT", "Internal", "internal"),
];

// (tag, name, weekday from Monday, start hour, minutes, billable)
const RECORDINGS: &[(&str, &str, i64, u32, i64, bool)] = &[
    ("DAG", "Sprint planning", 0, 9, 90, true),
    ("DAG", "Importer refactoring", 0, 13, 240, true),
    ("INT", "Team meeting", 1, 10, 60, false),
    ("DAG", "Code review", 1, 14, 150, true),
    ("INT", "Expense report", 2, 8, 45, false),
    ("DAG", "Release 1.2", 3, 9, 300, true),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = if let Ok(path) = std::env::var("TIMETRACKING_DB_PATH") {
        PathBuf::from(path)
    } else {
        load_or_init(&config_path(None))?.resolved_database_file()
    };

    println!("Connecting to database at: {}", db_path.display());

    let db = Database::open_at(&db_path)?;
    let repo = db.repository();

    for (tag, name, project_type) in PROJECTS {
        match repo.create_project(&Project::new(*tag, *name, *project_type)) {
            Ok(project) => println!("Inserted project: {} ({})", project.name, project.tag),
            Err(RepositoryError::Duplicate) => println!("Project {tag} already exists"),
            Err(err) => return Err(err.into()),
        }
    }

    let (year, week) = current_week();
    let range = week_range(year, week).ok_or("current week out of range")?;
    for (tag, name, day, hour, minutes, billable) in RECORDINGS {
        let date = range.start + Duration::days(*day);
        let time = NaiveTime::from_hms_opt(*hour, 0, 0).ok_or("invalid hour")?;
        let Some(start) = Local.from_local_datetime(&date.and_time(time)).earliest() else {
            continue;
        };
        let start = start.to_utc();
        let recording = repo.create_recording(
            NewRecording::new(*tag, *name)
                .billable(*billable)
                .starting_at(start)
                .ending_at(start + Duration::minutes(*minutes)),
        )?;
        println!(
            "Inserted recording #{}: {} on {} ({} min)",
            recording.id,
            recording.name,
            date.weekday(),
            minutes
        );
    }

    println!("\nSample data successfully added to database!");
    println!("Database location: {}", db_path.display());
    println!("Run the application with `cargo run` and type `week` to see this week's report.");

    Ok(())
}
