use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status shared by projects and recordings.
///
/// Persisted as an integer column: `0` is active, anything else reads back
/// as inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Active => 0,
            Self::Inactive => 1,
        }
    }

    pub fn from_i64(value: i64) -> Self {
        if value == 0 {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// Human readable label, `"active"` or `"inactive"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "active" => Ok(Self::Active),
            "1" | "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown status: {other}")),
        }
    }
}
