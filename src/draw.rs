use chrono::Local;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::week_grid::WeekGrid;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;

static TABS: &[&str; 2] = &["Week", "Weeks"];

const HELP_LINES: &[(&str, &str)] = &[
    ("h / ←", "previous week"),
    ("l / →", "next week"),
    ("t", "week containing tomorrow"),
    ("j / k", "scroll teams (week list: move)"),
    ("Enter", "show highlighted week (week list)"),
    ("1 / 2", "week grid / week list"),
    ("R", "reload schedule"),
    ("f", "toggle full screen"),
    ("\"", "toggle log pane"),
    ("?", "help (Esc to close)"),
    ("q / Ctrl-C", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Grid => draw_week(f, layout.main, app),
            MenuItem::Weeks => draw_weeks_list(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Grid => 0,
        MenuItem::Weeks => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Shown in place of a view while there is nothing to draw.
fn status_message(app: &App, what: &str) -> Option<String> {
    if let Some(err) = app.state.last_error.as_deref()
        && !app.state.week.is_loaded()
    {
        return Some(format!("Schedule load failed:\n{err}\n\nPress R to retry"));
    }
    if !app.state.week.is_loaded() {
        return Some("Loading schedule...".to_string());
    }
    if app.state.week.weeks.is_empty() {
        return Some(format!("No games in schedule, nothing to show in {what}"));
    }
    None
}

fn draw_week(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" NHL Weekly Schedule ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(msg) = status_message(app, "the week grid") {
        draw_centered(f, inner, msg);
        return;
    }
    let Some(week) = app.state.week.selected() else {
        return;
    };

    let [header, key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    let position = format!(
        "Week {}/{}",
        app.state.week.selected_week + 1,
        app.state.week.weeks.len()
    );
    let mut spans = vec![
        Span::styled(week.label(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  |  {position}  |  {} games", week.games.len())),
    ];
    if app.state.week.default_week == Some(app.state.week.selected_week) {
        spans.push(Span::styled("  (this week)", Style::default().fg(Color::Green)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), header);

    let mut legend = "Keys: h/l=week  t=this week  j/k=scroll  2=week list  R=reload  ?=help  q=quit".to_string();
    if let Some(err) = app.state.last_error.as_deref() {
        legend = format!("Reload failed: {err}");
    }
    f.render_widget(
        Paragraph::new(legend).style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    f.render_widget(
        WeekGrid {
            week,
            teams: &app.state.week.teams,
            scroll_offset: app.state.week.scroll_offset,
            tz: &Local,
        },
        content,
    );
}

fn draw_weeks_list(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Weeks ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(msg) = status_message(app, "the week list") {
        draw_centered(f, inner, msg);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .week
        .weeks
        .iter()
        .enumerate()
        .map(|(idx, week)| {
            let mut spans = vec![Span::raw(format!(
                "{:<28} {:>3} games",
                week.label(),
                week.games.len()
            ))];
            if idx == app.state.week.selected_week {
                spans.push(Span::styled("  [shown]", Style::default().fg(Color::Cyan)));
            }
            if app.state.week.default_week == Some(idx) {
                spans.push(Span::styled("  [this week]", Style::default().fg(Color::Green)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.weeks_cursor));
    f.render_stateful_widget(list, inner, &mut state);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>12}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logger, area);
}

fn draw_centered(f: &mut Frame, area: Rect, msg: String) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
