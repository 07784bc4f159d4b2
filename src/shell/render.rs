//! Table rendering for the shell.

use crate::application::{WEEKDAY_LABELS, WeekMatrix, WeekSummary};
use crate::domain::{Project, Recording};
use chrono::{DateTime, Duration, TimeZone, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use std::fmt::Display;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn new_table<I, T>(header: I) -> Table
where
    I: IntoIterator<Item = T>,
    T: Into<Cell>,
{
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn number(value: impl ToString) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

/// `2h 05m` style rendering of a duration. Negative durations carry a
/// single leading sign.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes();
    let sign = if minutes < 0 { "-" } else { "" };
    let minutes = minutes.unsigned_abs();
    format!("{sign}{}h {:02}m", minutes / 60, minutes % 60)
}

fn format_time<Tz: TimeZone>(time: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    time.with_timezone(tz).format(TIME_FORMAT).to_string()
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

pub fn projects_table(projects: &[Project]) -> Table {
    let mut table = new_table(["Tag", "Name", "Type", "Status"]);
    for project in projects {
        table.add_row([
            project.tag.as_str(),
            project.name.as_str(),
            project.project_type.as_str(),
            project.status_string(),
        ]);
    }
    table
}

pub fn recordings_table<Tz: TimeZone>(recordings: &[Recording], tz: &Tz) -> Table
where
    Tz::Offset: Display,
{
    let mut table = new_table([
        "#", "Project", "Name", "Start", "End", "Duration", "Billable", "Status",
    ]);
    for recording in recordings {
        table.add_row(vec![
            number(recording.id),
            Cell::new(&recording.project_tag),
            Cell::new(&recording.name),
            Cell::new(format_time(&recording.start_time, tz)),
            Cell::new(
                recording
                    .end_time
                    .map(|end| format_time(&end, tz))
                    .unwrap_or_else(|| "running".to_string()),
            ),
            number(
                recording
                    .duration()
                    .map(format_duration)
                    .unwrap_or_default(),
            ),
            Cell::new(yes_no(recording.billable)),
            Cell::new(recording.status_string()),
        ]);
    }
    table
}

pub fn summary_table<Tz: TimeZone>(summary: &WeekSummary, tz: &Tz) -> Table
where
    Tz::Offset: Display,
{
    let mut table = new_table(["#", "Project", "Name", "Start", "End", "Hours", "Billable"]);
    for recording in &summary.entries {
        table.add_row(vec![
            number(recording.id),
            Cell::new(&recording.project_tag),
            Cell::new(&recording.name),
            Cell::new(format_time(&recording.start_time, tz)),
            Cell::new(
                recording
                    .end_time
                    .map(|end| format_time(&end, tz))
                    .unwrap_or_default(),
            ),
            number(format_hours(recording.hours())),
            Cell::new(yes_no(recording.billable)),
        ]);
    }
    table.add_row(vec![
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new("Billable"),
        number(format_hours(summary.billable_hours)),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new("Total"),
        number(format_hours(summary.total_hours)),
        Cell::new(""),
    ]);
    table
}

pub fn matrix_table(matrix: &WeekMatrix) -> Table {
    let header = std::iter::once("#")
        .chain(WEEKDAY_LABELS)
        .chain(std::iter::once("Total"));
    let mut table = new_table(header);

    for row in &matrix.rows {
        let mut cells = vec![Cell::new(&row.project_tag)];
        cells.extend(row.hours.iter().map(|h| number(format_hours(*h))));
        cells.push(number(format_hours(row.total())));
        table.add_row(cells);
    }

    let mut totals = vec![Cell::new("Total")];
    totals.extend(matrix.daily_totals().iter().map(|h| number(format_hours(*h))));
    totals.push(number(format_hours(matrix.total())));
    table.add_row(totals);
    table
}
