use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use football_data_api::view::StageView;
use football_data_api::{Competition, MatchRow};
use log::{debug, warn};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MenuItem {
    #[default]
    WorldCup,
    ChampionsLeague,
    Help,
}

impl MenuItem {
    pub fn competition(&self) -> Option<Competition> {
        match self {
            MenuItem::WorldCup => Some(Competition::WorldCup),
            MenuItem::ChampionsLeague => Some(Competition::ChampionsLeague),
            MenuItem::Help => None,
        }
    }
}

impl From<Competition> for MenuItem {
    fn from(competition: Competition) -> Self {
        match competition {
            Competition::WorldCup => MenuItem::WorldCup,
            Competition::ChampionsLeague => MenuItem::ChampionsLeague,
        }
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        Self::with_settings(AppSettings::load())
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        log::set_max_level(settings.log_level);
        tui_logger::set_default_level(settings.log_level);

        let mut app = Self { state: AppState::new(), settings };
        app.state.select_competition(Competition::default());
        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_matches_loaded(
        &mut self,
        competition: Competition,
        rows: Vec<MatchRow>,
        failure: Option<String>,
    ) {
        match &failure {
            Some(msg) => warn!("{competition} unavailable: {msg}"),
            None => debug!("{competition}: {} rows", rows.len()),
        }
        self.state.store_rows(competition, rows, failure);
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
        if let Some(competition) = next.competition() {
            self.state.select_competition(competition);
        }
    }

    pub fn select_competition(&mut self, competition: Competition) {
        self.update_tab(competition.into());
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

    /// The competition whose data is on screen, if any.
    pub fn current_competition(&self) -> Option<Competition> {
        self.state.selection.competition()
    }

    // -----------------------------------------------------------------------
    // Stage navigation, delegated to AppState
    // -----------------------------------------------------------------------

    pub fn next_stage(&mut self) {
        self.state.next_stage();
    }

    pub fn prev_stage(&mut self) {
        self.state.prev_stage();
    }

    pub fn next_section(&mut self) {
        self.state.next_section();
    }

    pub fn prev_section(&mut self) {
        self.state.prev_section();
    }

    pub fn next_table_page(&mut self) {
        self.state.next_table_page();
    }

    pub fn prev_table_page(&mut self) {
        self.state.prev_table_page();
    }

    pub fn current_view(&mut self) -> Option<&StageView> {
        self.state.current_view()
    }
}
