//! JSON query surface: every week, or a single week by its Monday.

use crate::{Game, Schedule, WeekBucket, dates, pivot};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSchedule {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub teams: Vec<TeamSchedule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSchedule {
    pub team: String,
    pub game_count: usize,
    pub games: Vec<Game>,
}

impl From<&WeekBucket> for WeekSchedule {
    fn from(week: &WeekBucket) -> Self {
        // Team order and counts come from the pivot so every surface agrees.
        let teams = pivot::build_team_views(week)
            .into_iter()
            .map(|view| TeamSchedule {
                games: week
                    .games
                    .iter()
                    .filter(|g| g.involves(&view.team))
                    .cloned()
                    .collect(),
                game_count: view.total_games,
                team: view.team,
            })
            .collect();

        WeekSchedule {
            week_start: week.week_start,
            week_end: week.week_end,
            teams,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidWeek(String),
    NotFound(String),
}

impl QueryError {
    /// HTTP-equivalent status for callers that expose the query over a wire.
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::InvalidWeek(_) => 400,
            QueryError::NotFound(_) => 404,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidWeek(raw) => write!(f, "Invalid week {raw:?}, expected YYYY-MM-DD"),
            QueryError::NotFound(_) => f.write_str("Week not found"),
        }
    }
}

impl std::error::Error for QueryError {}

pub fn all_weeks(schedule: &Schedule) -> Vec<WeekSchedule> {
    schedule.weeks().iter().map(WeekSchedule::from).collect()
}

/// The week whose Monday is exactly `week_start`. Other weekdays do not match.
pub fn week(schedule: &Schedule, week_start: &str) -> Result<WeekSchedule, QueryError> {
    let start = dates::parse_date(week_start)
        .ok_or_else(|| QueryError::InvalidWeek(week_start.to_owned()))?;
    schedule
        .week(start)
        .map(|bucket| WeekSchedule::from(&bucket))
        .ok_or_else(|| QueryError::NotFound(dates::format_date(start)))
}
