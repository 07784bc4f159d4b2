//! Small pure helpers shared across layers.

pub mod week;

pub use week::{WeekRange, current_week, iso_week_of, week_range, week_start};
