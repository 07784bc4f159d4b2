//! Integration tests for the database functionality
//! These tests drive projects, recordings and reports through the public API

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;
use timetracking::application::{WeekMatrix, WeekSummary, fetch_week};
use timetracking::domain::{NewRecording, Project, Status};
use timetracking::infra::app_config::{AppConfig, load_or_init};
use timetracking::infra::db::{Database, RepositoryError};
use timetracking::utils::week_range;

#[test]
fn test_project_lifecycle() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let repo = db.repository();

    repo.create_project(&Project::new("DAG", "Dagobah", "internal"))?;

    let project = repo.get_project_by_tag("DAG")?;
    assert_eq!(project.name, "Dagobah");
    assert_eq!(project.project_type, "internal");
    assert_eq!(project.status.as_i64(), 0);
    assert_eq!(project.status_string(), "active");

    repo.update_project(
        "DAG",
        &Project::new("DAG", "Dagobah", "internal").with_status(Status::Inactive),
    )?;

    assert!(
        repo.all_active_projects()?
            .iter()
            .all(|p| p.tag != "DAG")
    );
    assert!(repo.all_projects()?.iter().any(|p| p.tag == "DAG"));
    Ok(())
}

#[test]
fn test_recording_lifecycle() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let repo = db.repository();
    repo.create_project(&Project::new("DAG", "Dagobah", "internal"))?;

    let created = repo.create_recording(NewRecording::new("DAG", "build").billable(true))?;
    assert_ne!(created.id, 0);
    assert!(created.is_open());

    let all = repo.all_recordings()?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, created.id);
    assert_eq!(all[0].project_tag, "DAG");
    assert!(all[0].billable);

    let mut stopped = created.clone();
    stopped.end_time = Some(created.start_time + Duration::minutes(45));
    repo.update_recording(created.id, &stopped)?;
    assert!(repo.latest_open_recording()?.is_none());

    repo.delete_recording(created.id)?;
    assert!(matches!(
        repo.get_recording(created.id),
        Err(RepositoryError::NotFound)
    ));
    Ok(())
}

#[test]
fn test_week_report_from_database() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let repo = db.repository();
    repo.create_project(&Project::new("DAG", "Dagobah", "development"))?;
    repo.create_project(&Project::new("INT", "Internal", "internal"))?;

    let monday = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
    for (tag, offset_days, minutes, billable) in [
        ("DAG", 0, 120, true),
        ("INT", 0, 60, false),
        ("DAG", 2, 30, true),
        ("DAG", 7, 60, true),
    ] {
        let start = monday + Duration::days(offset_days);
        repo.create_recording(
            NewRecording::new(tag, "work")
                .billable(billable)
                .starting_at(start)
                .ending_at(start + Duration::minutes(minutes)),
        )?;
    }
    repo.create_recording(NewRecording::new("INT", "running").starting_at(monday))?;

    let range = week_range(2024, 10).unwrap();
    let recordings = fetch_week(&repo, &range, &Utc)?;
    assert_eq!(recordings.len(), 3);

    let summary = WeekSummary::build(range, &recordings, &Utc);
    assert_eq!(summary.total_hours, 3.5);
    assert_eq!(summary.billable_hours, 2.5);

    let matrix = WeekMatrix::build(range, &recordings, &Utc);
    assert_eq!(matrix.rows.len(), 2);
    assert_eq!(matrix.rows[0].hours[0], 2.0);
    assert_eq!(matrix.rows[0].hours[2], 0.5);
    assert_eq!(matrix.rows[1].hours[0], 1.0);
    Ok(())
}

#[test]
fn test_file_backed_database_persists() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let config_file = dir.path().join("app_config.toml");
    std::fs::write(
        &config_file,
        format!(
            "databaseDriver = \"sqlite3\"\ndatabaseFile = \"{}\"\n",
            dir.path().join("data").join("tt.db").display()
        ),
    )?;

    let config: AppConfig = load_or_init(&config_file)?;
    {
        let db = Database::open(&config)?;
        db.repository()
            .create_project(&Project::new("DAG", "Dagobah", "internal"))?;
    }

    let db = Database::open(&config)?;
    let project = db.repository().get_project_by_tag("DAG")?;
    assert_eq!(project.name, "Dagobah");
    assert!(dir.path().join("data").join("tt.db").exists());
    Ok(())
}
