use super::Status;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned surrogate key of a recording.
pub type RecordingId = i64;

/// A span of time booked against a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Assigned once by the store on insert.
    pub id: RecordingId,
    /// Tag of the project this time belongs to. Not enforced by the store.
    pub project_tag: String,
    pub start_time: DateTime<Utc>,
    /// `None` while the recording is still running.
    pub end_time: Option<DateTime<Utc>>,
    pub name: String,
    pub billable: bool,
    pub note: String,
    #[serde(default)]
    pub status: Status,
}

impl Recording {
    pub fn status_string(&self) -> &'static str {
        self.status.label()
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Elapsed time of a closed recording. Open recordings have no duration.
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// Duration in fractional hours, `0.0` for open recordings.
    pub fn hours(&self) -> f64 {
        self.duration()
            .map(|d| d.num_seconds() as f64 / 3600.0)
            .unwrap_or(0.0)
    }
}

/// Input for creating a recording; the id is assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecording {
    pub project_tag: String,
    /// Defaults to the moment of insertion when unset.
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub name: String,
    pub billable: bool,
    pub note: String,
    #[serde(default)]
    pub status: Status,
}

impl NewRecording {
    pub fn new(project_tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            project_tag: project_tag.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn billable(mut self, billable: bool) -> Self {
        self.billable = billable;
        self
    }

    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self
    }

    pub fn ending_at(mut self, end: DateTime<Utc>) -> Self {
        self.end_time = Some(end);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Materialize the recording once the store has assigned its id and
    /// the start time has been resolved.
    pub fn into_recording(self, id: RecordingId, start_time: DateTime<Utc>) -> Recording {
        Recording {
            id,
            project_tag: self.project_tag,
            start_time,
            end_time: self.end_time,
            name: self.name,
            billable: self.billable,
            note: self.note,
            status: self.status,
        }
    }
}
