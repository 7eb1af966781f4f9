use crate::{Game, WeekBucket};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Group games into Monday-keyed week buckets, earliest week first.
///
/// Every input game lands in exactly one bucket; within a bucket games keep
/// their input order. Weeks without games produce no bucket.
pub fn partition(games: &[Game]) -> Vec<WeekBucket> {
    let mut weeks: BTreeMap<NaiveDate, Vec<Game>> = BTreeMap::new();
    for game in games {
        weeks.entry(game.week_start()).or_default().push(game.clone());
    }
    weeks
        .into_iter()
        .map(|(week_start, games)| WeekBucket::new(week_start, games))
        .collect()
}

/// Look up a bucket by its Monday. `weeks` must be sorted, as `partition` returns it.
pub fn find_week(weeks: &[WeekBucket], week_start: NaiveDate) -> Option<&WeekBucket> {
    weeks
        .binary_search_by_key(&week_start, |w| w.week_start)
        .ok()
        .map(|idx| &weeks[idx])
}
