//! Domain types for the time tracker.
//! Defines projects, the recordings booked against them and their status.

pub mod project;
pub mod recording;
pub mod status;

pub use project::*;
pub use recording::*;
pub use status::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_project_status_string() {
        let project = Project::new("DAG", "Dagobah", "internal");
        assert_eq!(project.status_string(), "active");

        let project = project.with_status(Status::Inactive);
        assert_eq!(project.status_string(), "inactive");
    }

    #[test]
    fn test_recording_hours() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 4, 11, 15, 0).unwrap();

        let closed = NewRecording::new("DAG", "build")
            .starting_at(start)
            .ending_at(end)
            .into_recording(1, start);
        assert!(!closed.is_open());
        assert_eq!(closed.hours(), 2.25);
        assert_eq!(closed.status_string(), "active");

        let open = NewRecording::new("DAG", "build").into_recording(2, start);
        assert!(open.is_open());
        assert_eq!(open.duration(), None);
        assert_eq!(open.hours(), 0.0);
    }

    #[test]
    fn test_recording_serializes_timestamps_as_rfc3339() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let recording = NewRecording::new("DAG", "build")
            .billable(true)
            .into_recording(3, start);

        let text = toml::to_string(&recording).unwrap();
        assert!(text.contains("start_time = \"2024-03-04T09:00:00Z\""), "{text}");
        assert!(!text.contains("end_time"), "{text}");
        assert!(text.contains("status = \"active\""), "{text}");

        let parsed: Recording = toml::from_str(&text).unwrap();
        assert_eq!(parsed, recording);
    }
}
