use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use football_data_api::{Competition, MatchRow};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadCompetition { competition: Competition },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// Always sent, even on failure: `rows` is then empty and `failure` says why.
    MatchesLoaded {
        competition: Competition,
        rows: Vec<MatchRow>,
        failure: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
