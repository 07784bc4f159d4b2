//! Weekly reports computed from closed recordings.

use crate::domain::Recording;
use crate::infra::db::{RepositoryResult, SqliteRepository};
use crate::utils::WeekRange;
use chrono::{Datelike, NaiveDate, TimeZone};
use std::collections::BTreeMap;

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Closed recordings of the week containing `range`, as seen from `tz`.
pub fn fetch_week<Tz: TimeZone>(
    repo: &SqliteRepository,
    range: &WeekRange,
    tz: &Tz,
) -> RepositoryResult<Vec<Recording>> {
    let (start, end) = range.utc_bounds(tz);
    repo.get_recordings_by_date_range(start, end)
}

fn local_date<Tz: TimeZone>(recording: &Recording, tz: &Tz) -> NaiveDate {
    recording.start_time.with_timezone(tz).date_naive()
}

/// Listing of the recordings booked in one week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSummary {
    pub range: WeekRange,
    pub entries: Vec<Recording>,
    pub total_hours: f64,
    pub billable_hours: f64,
}

impl WeekSummary {
    /// Keep the closed recordings that start inside `range` in `tz`.
    pub fn build<Tz: TimeZone>(range: WeekRange, recordings: &[Recording], tz: &Tz) -> Self {
        let entries: Vec<Recording> = recordings
            .iter()
            .filter(|r| !r.is_open() && range.contains(local_date(r, tz)))
            .cloned()
            .collect();
        let total_hours: f64 = entries.iter().map(Recording::hours).sum();
        let billable_hours: f64 = entries
            .iter()
            .filter(|r| r.billable)
            .map(Recording::hours)
            .sum();

        Self {
            range,
            entries,
            total_hours,
            billable_hours,
        }
    }

    pub fn non_billable_hours(&self) -> f64 {
        self.total_hours - self.billable_hours
    }
}

/// Hours of one project per weekday, Monday first.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub project_tag: String,
    pub hours: [f64; 7],
}

impl MatrixRow {
    pub fn total(&self) -> f64 {
        self.hours.iter().sum()
    }
}

/// Per-project, per-weekday hour totals of one week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekMatrix {
    pub range: WeekRange,
    /// One row per project tag, ordered by tag.
    pub rows: Vec<MatrixRow>,
}

impl WeekMatrix {
    /// Hours are attributed to the weekday the recording started on in `tz`.
    pub fn build<Tz: TimeZone>(range: WeekRange, recordings: &[Recording], tz: &Tz) -> Self {
        let mut by_tag: BTreeMap<&str, [f64; 7]> = BTreeMap::new();
        for recording in recordings.iter().filter(|r| !r.is_open()) {
            let day = local_date(recording, tz);
            if !range.contains(day) {
                continue;
            }
            let slot = day.weekday().num_days_from_monday() as usize;
            by_tag.entry(recording.project_tag.as_str()).or_default()[slot] += recording.hours();
        }

        let rows = by_tag
            .into_iter()
            .map(|(tag, hours)| MatrixRow {
                project_tag: tag.to_string(),
                hours,
            })
            .collect();
        Self { range, rows }
    }

    pub fn daily_totals(&self) -> [f64; 7] {
        let mut totals = [0.0; 7];
        for row in &self.rows {
            for (total, hours) in totals.iter_mut().zip(row.hours) {
                *total += hours;
            }
        }
        totals
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().map(MatrixRow::total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewRecording;
    use crate::infra::db::Database;
    use crate::utils::week_range;
    use chrono::{DateTime, Duration, Utc};

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
    }

    fn closed(id: i64, tag: &str, start: DateTime<Utc>, minutes: i64, billable: bool) -> Recording {
        NewRecording::new(tag, "work")
            .billable(billable)
            .ending_at(start + Duration::minutes(minutes))
            .into_recording(id, start)
    }

    fn sample() -> Vec<Recording> {
        vec![
            // Week 10 of 2024 runs from Monday March 4th to Sunday March 10th.
            closed(1, "DAG", at(4, 9, 0), 255, true),
            closed(2, "INT", at(4, 14, 0), 600, false),
            closed(3, "DAG", at(5, 8, 0), 120, true),
            closed(4, "INT", at(10, 10, 0), 30, false),
            // Previous and next week.
            closed(5, "DAG", at(3, 9, 0), 60, true),
            closed(6, "DAG", at(11, 9, 0), 60, true),
            NewRecording::new("DAG", "running").into_recording(7, at(6, 9, 0)),
        ]
    }

    #[test]
    fn test_week_summary_totals() {
        let range = week_range(2024, 10).unwrap();
        let summary = WeekSummary::build(range, &sample(), &Utc);

        let ids: Vec<_> = summary.entries.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(summary.total_hours, 16.75);
        assert_eq!(summary.billable_hours, 6.25);
        assert_eq!(summary.non_billable_hours(), 10.5);
    }

    #[test]
    fn test_week_matrix_groups_by_project_and_day() {
        let range = week_range(2024, 10).unwrap();
        let matrix = WeekMatrix::build(range, &sample(), &Utc);

        assert_eq!(matrix.rows.len(), 2);
        assert_eq!(matrix.rows[0].project_tag, "DAG");
        assert_eq!(matrix.rows[0].hours, [4.25, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(matrix.rows[1].project_tag, "INT");
        assert_eq!(matrix.rows[1].hours, [10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.5]);

        assert_eq!(matrix.daily_totals(), [14.25, 2.0, 0.0, 0.0, 0.0, 0.0, 0.5]);
        assert_eq!(matrix.total(), 16.75);
    }

    #[test]
    fn test_empty_week() {
        let range = week_range(2024, 20).unwrap();
        let matrix = WeekMatrix::build(range, &sample(), &Utc);
        assert!(matrix.rows.is_empty());
        assert_eq!(matrix.total(), 0.0);

        let summary = WeekSummary::build(range, &[], &Utc);
        assert!(summary.entries.is_empty());
        assert_eq!(summary.total_hours, 0.0);
    }

    #[test]
    fn test_fetch_week_uses_range_query() -> anyhow::Result<()> {
        let db = Database::open_in_memory()?;
        let repo = db.repository();
        for recording in sample() {
            let mut new = NewRecording::new(recording.project_tag, recording.name)
                .billable(recording.billable)
                .starting_at(recording.start_time);
            new.end_time = recording.end_time;
            repo.create_recording(new)?;
        }

        let range = week_range(2024, 10).unwrap();
        let fetched = fetch_week(&repo, &range, &Utc)?;
        assert_eq!(fetched.len(), 4);
        assert_eq!(WeekMatrix::build(range, &fetched, &Utc).total(), 16.75);
        Ok(())
    }
}
