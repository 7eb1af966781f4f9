use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use nhl_schedule::Schedule;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Load (or reload) the configured schedule source.
    LoadSchedule,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    ScheduleLoaded { schedule: Schedule },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
