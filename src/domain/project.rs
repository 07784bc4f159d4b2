use super::Status;
use serde::{Deserialize, Serialize};

/// Unique short identifier of a project (the primary key).
pub type ProjectTag = String;

/// Classifications offered when a project is created or edited,
/// as `(label, stored value)` pairs.
pub const PROJECT_TYPES: &[(&str, &str)] = &[
    ("Internal", "internal"),
    ("Customer", "customer"),
    ("Development", "development"),
    ("Open Source", "open source"),
    ("Other", "other"),
];

/// Longest tag the project form accepts.
pub const MAX_TAG_LEN: usize = 10;

/// Longest name the project form accepts.
pub const MAX_NAME_LEN: usize = 25;

/// Something time can be booked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub tag: ProjectTag,
    pub name: String,
    /// Free-form classification such as `internal` or `customer`.
    pub project_type: String,
    #[serde(default)]
    pub status: Status,
}

impl Project {
    pub fn new(
        tag: impl Into<String>,
        name: impl Into<String>,
        project_type: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            project_type: project_type.into(),
            status: Status::Active,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn status_string(&self) -> &'static str {
        self.status.label()
    }
}
