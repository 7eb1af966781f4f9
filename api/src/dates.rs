//! Calendar helpers shared by every week-aware call site.
//!
//! Weeks run Monday through Sunday and are keyed by their Monday. All week
//! and day arithmetic works on `NaiveDate` calendar dates; UTC timestamps are
//! only ever used for display.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;

pub const DAYS_IN_WEEK: usize = 7;

pub const DAY_LABELS: [&str; DAYS_IN_WEEK] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

const ISO_DATE: &str = "%Y-%m-%d";

/// 0 = Monday .. 6 = Sunday.
pub fn day_index(date: NaiveDate) -> usize {
    // (sunday-based day + 6) mod 7
    (date.weekday().num_days_from_sunday() as usize + 6) % DAYS_IN_WEEK
}

/// The Monday on or before `date`. A Sunday maps to the Monday six days earlier.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(day_index(date) as u64)
}

pub fn week_end(week_start: NaiveDate) -> NaiveDate {
    week_start + Days::new(DAYS_IN_WEEK as u64 - 1)
}

/// The calendar day after `now`, in `now`'s own timezone.
pub fn tomorrow<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDate {
    now.date_naive() + Days::new(1)
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// Accepts RFC 3339 (`2025-10-13T23:00:00Z`, `...-04:00`). A timestamp without
/// an offset is taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// 12-hour wall clock time in `tz`, e.g. "7:00 PM".
pub fn display_time<Tz: TimeZone>(time_utc: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    time_utc.with_timezone(tz).format("%-I:%M %p").to_string()
}

/// "Oct 13, 2025 - Oct 19, 2025"
pub fn format_week_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", start.format("%b %-d, %Y"), end.format("%b %-d, %Y"))
}
