//! ISO week helpers used by the weekly reports.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Monday that begins ISO week `week` of `year`.
///
/// The computation anchors on July 1st, which always lies well inside its
/// year, so week 1 and week 52/53 resolve correctly across year
/// boundaries. Weeks outside the year's range are extrapolated by whole
/// weeks instead of being rejected. Returns `None` only when the result
/// lies outside the supported calendar.
pub fn week_start(year: i32, week: i32) -> Option<NaiveDate> {
    let anchor = NaiveDate::from_ymd_opt(year, 7, 1)?;
    let monday = anchor - Duration::days(i64::from(anchor.weekday().num_days_from_monday()));
    let anchor_week = i64::from(monday.iso_week().week());
    let shift = Duration::try_weeks(i64::from(week) - anchor_week)?;
    monday.checked_add_signed(shift)
}

/// Monday through Sunday of ISO week `week` of `year`, both inclusive.
pub fn week_range(year: i32, week: i32) -> Option<WeekRange> {
    let start = week_start(year, week)?;
    let end = start.checked_add_signed(Duration::days(6))?;
    Some(WeekRange { start, end })
}

/// ISO `(year, week)` of the given date.
pub fn iso_week_of(date: NaiveDate) -> (i32, i32) {
    let week = date.iso_week();
    (week.year(), week.week() as i32)
}

/// ISO `(year, week)` of today in local time.
pub fn current_week() -> (i32, i32) {
    iso_week_of(Local::now().date_naive())
}

/// Seven calendar days from a Monday to the following Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The seven dates of the week, Monday first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |day| *day <= self.end)
    }

    /// Instant window covering the whole week in `tz`: from Monday 00:00
    /// up to the following Monday 00:00, expressed in UTC.
    pub fn utc_bounds<Tz: TimeZone>(&self, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        let next_monday = self.end.succ_opt().unwrap_or(self.end);
        (midnight_utc(self.start, tz), midnight_utc(next_monday, tz))
    }
}

/// Start of `date` in `tz`. Midnights skipped by a DST transition fall back
/// to the latest valid instant, and then to UTC midnight.
fn midnight_utc<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&naive).latest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weeks_in_year(year: i32) -> i32 {
        // December 28th always falls in the last ISO week of its year.
        date(year, 12, 28).iso_week().week() as i32
    }

    #[test]
    fn test_week_start_known_dates() {
        assert_eq!(week_start(2024, 1), Some(date(2024, 1, 1)));
        assert_eq!(week_start(2024, 10), Some(date(2024, 3, 4)));
        // ISO week 1 of 2021 starts in January; 2020 has 53 weeks.
        assert_eq!(week_start(2021, 1), Some(date(2021, 1, 4)));
        assert_eq!(week_start(2020, 53), Some(date(2020, 12, 28)));
        // ISO week 1 of 2025 starts in the previous calendar year.
        assert_eq!(week_start(2025, 1), Some(date(2024, 12, 30)));
        assert_eq!(week_start(2026, 43), Some(date(2026, 10, 19)));
    }

    #[test]
    fn test_week_start_is_monday_and_matches_iso_week() {
        for year in 1995..=2040 {
            for week in 1..=weeks_in_year(year) {
                let start = week_start(year, week).unwrap();
                assert_eq!(start.weekday(), Weekday::Mon, "{year}-W{week}");
                assert_eq!(iso_week_of(start), (year, week), "{year}-W{week}");
            }
        }
    }

    #[test]
    fn test_week_range_spans_seven_days() {
        for year in [2015, 2020, 2024, 2026] {
            for week in 1..=weeks_in_year(year) {
                let range = week_range(year, week).unwrap();
                assert_eq!(range.end - range.start, Duration::days(6));
                assert_eq!(range.end.weekday(), Weekday::Sun);
                assert_eq!(iso_week_of(range.end), (year, week));
                assert_eq!(range.days().count(), 7);
            }
        }
    }

    #[test]
    fn test_out_of_range_week_extrapolates() {
        assert_eq!(week_start(2024, 0), Some(date(2023, 12, 25)));
        assert_eq!(week_start(2024, 53), Some(date(2024, 12, 30)));
        assert_eq!(week_start(2024, -1), Some(date(2023, 12, 18)));
    }

    #[test]
    fn test_extreme_weeks_yield_none() {
        assert_eq!(week_start(2024, i32::MIN), None);
        assert_eq!(week_start(2024, i32::MAX), None);
        assert_eq!(week_range(i32::MAX, i32::MIN), None);
        assert!(week_start(2024, 100_000).is_some());
    }

    #[test]
    fn test_utc_bounds_cover_whole_week() {
        let range = week_range(2024, 10).unwrap();
        assert!(range.contains(date(2024, 3, 10)));
        assert!(!range.contains(date(2024, 3, 11)));

        let (start, end) = range.utc_bounds(&Utc);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap());
    }
}
