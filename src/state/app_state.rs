use crate::app::MenuItem;
use chrono::{DateTime, NaiveDate, TimeZone};
use nhl_schedule::{Schedule, TeamWeekView, WeekBucket, selector};

// ---------------------------------------------------------------------------
// Week navigation state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct WeekState {
    pub schedule: Option<Schedule>,
    /// All week buckets, earliest first. Recomputed whenever the schedule changes.
    pub weeks: Vec<WeekBucket>,
    /// Index into `weeks` of the week on screen.
    pub selected_week: usize,
    /// The week picked for "now" when the schedule was loaded.
    pub default_week: Option<usize>,
    /// Pivot of the selected week, rebuilt on every selection change.
    pub teams: Vec<TeamWeekView>,
    /// First visible team row in the grid.
    pub scroll_offset: u16,
}

impl WeekState {
    /// Swap in a freshly loaded schedule. A reload keeps the week on screen if
    /// it still exists; otherwise the default week for `now` is shown.
    pub fn load<Tz: TimeZone>(&mut self, schedule: Schedule, now: &DateTime<Tz>) {
        let previous = self.selected().map(|w| w.week_start);

        self.weeks = schedule.weeks();
        self.default_week = selector::default_week_index(&self.weeks, now);
        self.schedule = Some(schedule);

        let keep = previous.and_then(|start| self.index_of(start));
        self.select(keep.or(self.default_week).unwrap_or(0));
    }

    pub fn is_loaded(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn selected(&self) -> Option<&WeekBucket> {
        self.weeks.get(self.selected_week)
    }

    pub fn select(&mut self, idx: usize) {
        self.selected_week = idx.min(self.weeks.len().saturating_sub(1));
        self.teams = self
            .selected()
            .map(WeekBucket::team_views)
            .unwrap_or_default();
        self.scroll_offset = 0;
    }

    pub fn next_week(&mut self) {
        if self.selected_week + 1 < self.weeks.len() {
            self.select(self.selected_week + 1);
        }
    }

    pub fn prev_week(&mut self) {
        if self.selected_week > 0 {
            self.select(self.selected_week - 1);
        }
    }

    pub fn jump_to_default(&mut self) {
        if let Some(idx) = self.default_week {
            self.select(idx);
        }
    }

    pub fn scroll_down(&mut self) {
        let max = self.teams.len().saturating_sub(1) as u16;
        self.scroll_offset = (self.scroll_offset + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    fn index_of(&self, week_start: NaiveDate) -> Option<usize> {
        self.weeks
            .binary_search_by_key(&week_start, |w| w.week_start)
            .ok()
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub week: WeekState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nhl_schedule::{Game, dates};

    fn game(day: &str, home: &str, away: &str) -> Game {
        Game {
            date: dates::parse_date(day).unwrap(),
            home_team: home.into(),
            away_team: away.into(),
            time_utc: dates::parse_timestamp(&format!("{day}T23:00:00Z")).unwrap(),
            arena: String::new(),
        }
    }

    fn schedule() -> Schedule {
        Schedule::new(vec![
            game("2025-10-13", "TeamA", "TeamB"),
            game("2025-10-15", "TeamC", "TeamA"),
            game("2025-10-20", "TeamA", "TeamC"),
            game("2025-10-27", "TeamB", "TeamC"),
        ])
    }

    fn at(day: &str) -> DateTime<Utc> {
        dates::parse_timestamp(&format!("{day}T12:00:00Z")).unwrap()
    }

    fn start(state: &WeekState) -> String {
        dates::format_date(state.selected().unwrap().week_start)
    }

    #[test]
    fn load_selects_default_week_and_builds_pivot() {
        let mut state = WeekState::default();
        state.load(schedule(), &at("2025-10-12"));
        assert_eq!(start(&state), "2025-10-13");
        assert_eq!(state.default_week, Some(0));
        assert_eq!(state.teams.first().map(|t| t.team.as_str()), Some("TeamA"));
        assert_eq!(state.teams[0].total_games, 2);
    }

    #[test]
    fn navigation_stays_inside_existing_weeks() {
        let mut state = WeekState::default();
        state.load(schedule(), &at("2025-10-12"));
        state.prev_week();
        assert_eq!(start(&state), "2025-10-13");
        state.next_week();
        state.next_week();
        state.next_week();
        assert_eq!(start(&state), "2025-10-27");
        state.jump_to_default();
        assert_eq!(start(&state), "2025-10-13");
    }

    #[test]
    fn selection_change_resets_scroll() {
        let mut state = WeekState::default();
        state.load(schedule(), &at("2025-10-12"));
        state.scroll_down();
        state.scroll_down();
        assert_eq!(state.scroll_offset, 2);
        state.scroll_down();
        assert_eq!(state.scroll_offset, 2, "clamped to last team");
        state.next_week();
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn reload_keeps_the_week_on_screen() {
        let mut state = WeekState::default();
        state.load(schedule(), &at("2025-10-12"));
        state.next_week();
        state.load(schedule(), &at("2025-10-12"));
        assert_eq!(start(&state), "2025-10-20");
    }

    #[test]
    fn empty_schedule_has_nothing_selected() {
        let mut state = WeekState::default();
        state.load(Schedule::default(), &at("2025-10-12"));
        assert!(state.is_loaded());
        assert!(state.selected().is_none());
        assert!(state.teams.is_empty());
        assert!(state.default_week.is_none());
        state.next_week();
        state.prev_week();
        state.scroll_down();
        assert_eq!(state.scroll_offset, 0);
    }
}
