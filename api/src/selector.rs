use crate::{WeekBucket, dates};
use chrono::{DateTime, TimeZone};

/// Index of the week to show first, relative to `now`.
///
/// Targets the week containing tomorrow (in `now`'s timezone). Falls back to
/// the closest later week, then to the last week when all games are past.
pub fn default_week_index<Tz: TimeZone>(weeks: &[WeekBucket], now: &DateTime<Tz>) -> Option<usize> {
    if weeks.is_empty() {
        return None;
    }
    let target = dates::week_start(dates::tomorrow(now));

    if let Some(idx) = weeks.iter().position(|w| w.week_start == target) {
        return Some(idx);
    }

    weeks
        .iter()
        .enumerate()
        .filter(|(_, w)| w.week_start >= target)
        .min_by_key(|(_, w)| w.week_start)
        .map(|(idx, _)| idx)
        .or(Some(weeks.len() - 1))
}
