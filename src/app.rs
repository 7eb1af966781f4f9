use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use chrono::{DateTime, Local, TimeZone};
use log::info;
use nhl_schedule::Schedule;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Grid,
    Weeks,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    /// Highlighted row in the week list, independent of the week on the grid.
    pub weeks_cursor: usize,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        Self {
            state: AppState::new(),
            settings,
            weeks_cursor: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_schedule_loaded(&mut self, schedule: Schedule) {
        self.load_schedule_at(schedule, &Local::now());
    }

    pub fn load_schedule_at<Tz: TimeZone>(&mut self, schedule: Schedule, now: &DateTime<Tz>) {
        self.state.last_error = None;
        self.state.week.load(schedule, now);
        self.weeks_cursor = self.state.week.selected_week;
        if let Some(week) = self.state.week.selected() {
            info!("showing week of {}", week.week_start);
        }
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if self.state.active_tab == MenuItem::Weeks {
            self.weeks_cursor = self.state.week.selected_week;
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Week grid, delegated to WeekState
    // -----------------------------------------------------------------------

    pub fn next_week(&mut self) {
        self.state.week.next_week();
    }

    pub fn prev_week(&mut self) {
        self.state.week.prev_week();
    }

    pub fn jump_to_default_week(&mut self) {
        self.state.week.jump_to_default();
    }

    pub fn scroll_down(&mut self) {
        self.state.week.scroll_down();
    }

    pub fn scroll_up(&mut self) {
        self.state.week.scroll_up();
    }

    // -----------------------------------------------------------------------
    // Week list
    // -----------------------------------------------------------------------

    pub fn weeks_cursor_down(&mut self) {
        if self.weeks_cursor + 1 < self.state.week.weeks.len() {
            self.weeks_cursor += 1;
        }
    }

    pub fn weeks_cursor_up(&mut self) {
        self.weeks_cursor = self.weeks_cursor.saturating_sub(1);
    }

    /// Show the highlighted week on the grid.
    pub fn select_week_at_cursor(&mut self) {
        if self.weeks_cursor < self.state.week.weeks.len() {
            self.state.week.select(self.weeks_cursor);
            self.update_tab(MenuItem::Grid);
        }
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

    fn loaded_app() -> App {
        let mut app = App::new(AppSettings::default());
        let schedule = Schedule::new(vec![
            game("2025-10-13", "TeamA", "TeamB"),
            game("2025-10-20", "TeamA", "TeamC"),
            game("2025-10-27", "TeamB", "TeamC"),
        ]);
        let now: DateTime<Utc> = dates::parse_timestamp("2025-10-19T12:00:00Z").unwrap();
        app.load_schedule_at(schedule, &now);
        app
    }

    #[test]
    fn load_clears_error_and_picks_week_with_tomorrow() {
        let mut app = App::new(AppSettings::default());
        app.on_error("boom".into());
        let now: DateTime<Utc> = dates::parse_timestamp("2025-10-19T12:00:00Z").unwrap();
        app.load_schedule_at(Schedule::new(vec![game("2025-10-20", "TeamA", "TeamB")]), &now);
        assert!(app.state.last_error.is_none());
        assert_eq!(app.state.week.selected().unwrap().week_start, dates::parse_date("2025-10-20").unwrap());
    }

    #[test]
    fn weeks_tab_enter_selects_week_and_returns_to_grid() {
        let mut app = loaded_app();
        assert_eq!(app.state.week.selected_week, 1);

        app.update_tab(MenuItem::Weeks);
        assert_eq!(app.weeks_cursor, 1);
        app.weeks_cursor_down();
        app.weeks_cursor_down();
        assert_eq!(app.weeks_cursor, 2);
        app.select_week_at_cursor();

        assert_eq!(app.state.active_tab, MenuItem::Grid);
        assert_eq!(app.state.week.selected_week, 2);
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = loaded_app();
        app.update_tab(MenuItem::Weeks);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Weeks);
    }

    #[test]
    fn toggles_flip_flags() {
        let mut app = App::new(AppSettings::default());
        app.toggle_full_screen();
        app.toggle_show_logs();
        assert!(app.settings.full_screen);
        assert!(app.state.show_logs);
    }
}
