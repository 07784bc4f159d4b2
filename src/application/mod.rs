//! Application layer: report computations built on top of the repository.

pub mod report;

pub use report::{MatrixRow, WEEKDAY_LABELS, WeekMatrix, WeekSummary, fetch_week};
