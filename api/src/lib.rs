pub mod client;
pub mod dates;
pub mod loader;
pub mod nhle;
pub mod pivot;
pub mod query;
pub mod selector;
pub mod week;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use client::{LoadError, LoadResult};
pub use loader::ScheduleSource;
pub use query::{QueryError, TeamSchedule, WeekSchedule};

// ---------------------------------------------------------------------------
// Domain types, independent of CSV and NHL wire formats
// ---------------------------------------------------------------------------

/// One scheduled game. Field names double as the CSV header and JSON keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub time_utc: DateTime<Utc>,
    pub arena: String,
}

impl Game {
    /// (date, home, away): two rows with the same key are the same game.
    pub fn identity(&self) -> (NaiveDate, &str, &str) {
        (self.date, self.home_team.as_str(), self.away_team.as_str())
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// Week membership always comes from the calendar date, never `time_utc`.
    pub fn week_start(&self) -> NaiveDate {
        dates::week_start(self.date)
    }

    pub fn day_index(&self) -> usize {
        dates::day_index(self.date)
    }
}

/// A Monday–Sunday slice of the schedule. Only weeks with games exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub games: Vec<Game>,
}

impl WeekBucket {
    pub(crate) fn new(week_start: NaiveDate, games: Vec<Game>) -> Self {
        Self {
            week_start,
            week_end: dates::week_end(week_start),
            games,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.week_start..=self.week_end).contains(&date)
    }

    /// Pivot this week into one row per team. See [`pivot::build_team_views`].
    pub fn team_views(&self) -> Vec<TeamWeekView> {
        pivot::build_team_views(self)
    }

    /// "Oct 13, 2025 - Oct 19, 2025"
    pub fn label(&self) -> String {
        dates::format_week_range(self.week_start, self.week_end)
    }
}

/// One cell entry in the team × day grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub opponent: String,
    pub is_home: bool,
    /// Kept raw; consumers pick the display timezone.
    pub time_utc: DateTime<Utc>,
}

impl DayEntry {
    pub fn display_time<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        dates::display_time(&self.time_utc, tz)
    }

    /// "vs Boston Bruins" at home, "@ Boston Bruins" on the road.
    pub fn matchup_label(&self) -> String {
        let marker = if self.is_home { "vs" } else { "@" };
        format!("{marker} {}", self.opponent)
    }
}

/// A team's week, indexed by day (0 = Monday .. 6 = Sunday).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamWeekView {
    pub team: String,
    pub total_games: usize,
    pub games_by_day: [Vec<DayEntry>; dates::DAYS_IN_WEEK],
}

impl TeamWeekView {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            total_games: 0,
            games_by_day: Default::default(),
        }
    }

    pub fn push(&mut self, day_index: usize, entry: DayEntry) {
        self.games_by_day[day_index].push(entry);
        self.total_games += 1;
    }

    pub fn games_on(&self, day_index: usize) -> &[DayEntry] {
        self.games_by_day
            .get(day_index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Dataset handle
// ---------------------------------------------------------------------------

/// The loaded, immutable game list. Cloning shares the same allocation;
/// replacing a `Schedule` value swaps the whole dataset at once.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    games: Arc<[Game]>,
}

impl Schedule {
    pub fn new(games: Vec<Game>) -> Self {
        Self { games: games.into() }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn weeks(&self) -> Vec<WeekBucket> {
        week::partition(&self.games)
    }

    pub fn week(&self, week_start: NaiveDate) -> Option<WeekBucket> {
        week::find_week(&self.weeks(), week_start).cloned()
    }
}

impl From<Vec<Game>> for Schedule {
    fn from(games: Vec<Game>) -> Self {
        Self::new(games)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(s: &str) -> NaiveDate {
        dates::parse_date(s).expect("fixture date")
    }

    pub fn game(day: &str, home: &str, away: &str, time_utc: &str) -> Game {
        Game {
            date: date(day),
            home_team: home.into(),
            away_team: away.into(),
            time_utc: dates::parse_timestamp(time_utc).expect("fixture timestamp"),
            arena: format!("{home} Arena"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{date, game};
    use super::*;

    #[test]
    fn schedule_week_matches_partitioned_bucket() {
        let schedule = Schedule::new(vec![
            game("2025-10-13", "TeamA", "TeamB", "2025-10-13T23:00:00Z"),
            game("2025-10-19", "TeamC", "TeamA", "2025-10-19T19:00:00Z"),
            game("2025-10-20", "TeamA", "TeamC", "2025-10-20T23:00:00Z"),
        ]);
        let week = schedule.week(date("2025-10-13")).expect("week exists");
        assert_eq!(week.games.len(), 2);
        assert_eq!(Some(&week), schedule.weeks().first());
        assert!(schedule.week(date("2025-10-06")).is_none());
    }

    #[test]
    fn schedule_clone_shares_games() {
        let schedule = Schedule::new(vec![game(
            "2025-10-13",
            "TeamA",
            "TeamB",
            "2025-10-13T23:00:00Z",
        )]);
        let copy = schedule.clone();
        assert!(Arc::ptr_eq(&schedule.games, &copy.games));
    }

    #[test]
    fn bucket_contains_its_sunday() {
        let bucket = WeekBucket::new(date("2025-10-13"), vec![]);
        assert_eq!(bucket.week_end, date("2025-10-19"));
        assert!(bucket.contains(date("2025-10-19")));
        assert!(!bucket.contains(date("2025-10-20")));
        assert_eq!(bucket.label(), "Oct 13, 2025 - Oct 19, 2025");
    }

    #[test]
    fn team_view_push_counts_games() {
        let mut view = TeamWeekView::new("TeamA");
        let entry = DayEntry {
            opponent: "TeamB".into(),
            is_home: false,
            time_utc: dates::parse_timestamp("2025-10-13T23:00:00Z").unwrap(),
        };
        view.push(0, entry.clone());
        view.push(6, entry);
        assert_eq!(view.total_games, 2);
        assert_eq!(view.games_on(6)[0].matchup_label(), "@ TeamB");
        assert!(view.games_on(3).is_empty());
        assert!(view.games_on(9).is_empty());
    }
}
