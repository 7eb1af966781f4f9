use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Grid),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Weeks),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Week grid
        (MenuItem::Grid, Char('l') | KeyCode::Right, _) => guard.next_week(),
        (MenuItem::Grid, Char('h') | KeyCode::Left, _) => guard.prev_week(),
        (MenuItem::Grid, Char('j') | KeyCode::Down, _) => guard.scroll_down(),
        (MenuItem::Grid, Char('k') | KeyCode::Up, _) => guard.scroll_up(),
        (MenuItem::Grid, Char('t'), _) => guard.jump_to_default_week(),

        // Week list
        (MenuItem::Weeks, Char('j') | KeyCode::Down, _) => guard.weeks_cursor_down(),
        (MenuItem::Weeks, Char('k') | KeyCode::Up, _) => guard.weeks_cursor_up(),
        (MenuItem::Weeks, KeyCode::Enter, _) => guard.select_week_at_cursor(),
        (MenuItem::Weeks, KeyCode::Esc, _) => guard.update_tab(MenuItem::Grid),

        // Global
        (_, Char('R'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadSchedule).await;
        }
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
