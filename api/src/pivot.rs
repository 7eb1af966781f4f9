use crate::{DayEntry, TeamWeekView, WeekBucket};
use std::collections::HashMap;

/// Re-index one week by team and day-of-week.
///
/// Each game adds a home entry for `home_team` and a mirrored away entry for
/// `away_team` on the game's day. Within a day, entries keep bucket order.
/// Teams come back busiest first; equal counts sort by team name.
pub fn build_team_views(week: &WeekBucket) -> Vec<TeamWeekView> {
    let mut views: HashMap<&str, TeamWeekView> = HashMap::new();

    for game in &week.games {
        let day = game.day_index();

        views
            .entry(game.home_team.as_str())
            .or_insert_with(|| TeamWeekView::new(&game.home_team))
            .push(
                day,
                DayEntry {
                    opponent: game.away_team.clone(),
                    is_home: true,
                    time_utc: game.time_utc,
                },
            );

        views
            .entry(game.away_team.as_str())
            .or_insert_with(|| TeamWeekView::new(&game.away_team))
            .push(
                day,
                DayEntry {
                    opponent: game.home_team.clone(),
                    is_home: false,
                    time_utc: game.time_utc,
                },
            );
    }

    let mut views: Vec<TeamWeekView> = views.into_values().collect();
    views.sort_by(|a, b| {
        b.total_games
            .cmp(&a.total_games)
            .then_with(|| a.team.cmp(&b.team))
    });
    views
}
