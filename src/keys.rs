use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use football_data_api::Competition;
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
        (_, Char('1'), _) => guard.select_competition(Competition::WorldCup),
        (_, Char('2'), _) => guard.select_competition(Competition::ChampionsLeague),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),
        (MenuItem::Help, _, _) => {}

        // Stage navigation
        (_, Char('l') | KeyCode::Right, _) => guard.next_stage(),
        (_, Char('h') | KeyCode::Left, _) => guard.prev_stage(),
        (_, Char('j') | KeyCode::Down, _) => guard.next_section(),
        (_, Char('k') | KeyCode::Up, _) => guard.prev_section(),
        (_, KeyCode::PageDown, _) => guard.next_table_page(),
        (_, KeyCode::PageUp, _) => guard.prev_table_page(),

        (_, Char('r'), _) => {
            if let Some(competition) = guard.current_competition() {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::LoadCompetition { competition })
                    .await;
                return;
            }
        }

        _ => {}
    }
}
