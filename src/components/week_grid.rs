use chrono::{Days, TimeZone};
use nhl_schedule::dates::{DAY_LABELS, DAYS_IN_WEEK};
use nhl_schedule::{DayEntry, TeamWeekView, WeekBucket};
use std::fmt::Display;
use tui::buffer::Buffer;
use tui::layout::{Constraint, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span, Text};
use tui::widgets::{Cell, Row, Table, Widget};

const TEAM_COLUMN_MIN: u16 = 14;
const TEAM_COLUMN_MAX: u16 = 28;

/// Team × day table for one week. Rows come pre-sorted from the pivot.
pub struct WeekGrid<'a, Tz: TimeZone> {
    pub week: &'a WeekBucket,
    pub teams: &'a [TeamWeekView],
    pub scroll_offset: u16,
    pub tz: &'a Tz,
}

impl<Tz> Widget for WeekGrid<'_, Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let header = Row::new(
            std::iter::once(Cell::from("Team (Games)"))
                .chain(day_headers(self.week).into_iter().map(Cell::from)),
        )
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

        let rows = self
            .teams
            .iter()
            .skip(self.scroll_offset as usize)
            .map(|team| {
                let cells = std::iter::once(Cell::from(team_label(team))).chain(
                    (0..DAYS_IN_WEEK).map(|day| Cell::from(cell_text(team.games_on(day), self.tz))),
                );
                Row::new(cells).height(row_height(team))
            });

        let team_width = self
            .teams
            .iter()
            .map(|t| team_label(t).chars().count() as u16)
            .max()
            .unwrap_or_default()
            .clamp(TEAM_COLUMN_MIN, TEAM_COLUMN_MAX);
        let widths = std::iter::once(Constraint::Length(team_width))
            .chain(std::iter::repeat_n(Constraint::Fill(1), DAYS_IN_WEEK));

        Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .render(area, buf);
    }
}

/// "MON 10/13" .. "SUN 10/19"
pub fn day_headers(week: &WeekBucket) -> Vec<String> {
    DAY_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let date = week.week_start + Days::new(i as u64);
            format!("{label} {}", date.format("%m/%d"))
        })
        .collect()
}

pub fn team_label(team: &TeamWeekView) -> String {
    format!("{} ({})", team.team, team.total_games)
}

/// Two lines per game: matchup, then local start time.
pub fn cell_lines<Tz>(entries: &[DayEntry], tz: &Tz) -> Vec<(String, String)>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    entries
        .iter()
        .map(|entry| (entry.matchup_label(), entry.display_time(tz)))
        .collect()
}

fn cell_text<'a, Tz>(entries: &[DayEntry], tz: &Tz) -> Text<'a>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut lines = Vec::with_capacity(entries.len() * 2);
    for (entry, (matchup, time)) in entries.iter().zip(cell_lines(entries, tz)) {
        let color = if entry.is_home { Color::White } else { Color::Gray };
        lines.push(Line::from(Span::styled(matchup, Style::default().fg(color))));
        lines.push(Line::from(Span::styled(time, Style::default().fg(Color::DarkGray))));
    }
    Text::from(lines)
}

/// Tallest day decides the row; a team never has an empty row.
pub fn row_height(team: &TeamWeekView) -> u16 {
    let busiest = (0..DAYS_IN_WEEK)
        .map(|day| team.games_on(day).len())
        .max()
        .unwrap_or_default();
    (busiest.max(1) * 2) as u16
}
