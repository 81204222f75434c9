use crate::state::messages::{NetworkRequest, NetworkResponse};
use football_data_api::client::{ApiConfig, FootballDataApi};
use football_data_api::normalize::{FailurePolicy, normalize};
use football_data_api::{Competition, MatchRow};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: FootballDataApi,
    policy: FailurePolicy,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        config: ApiConfig,
        policy: FailurePolicy,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: FootballDataApi::new(config),
            policy,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let response = match request {
                NetworkRequest::LoadCompetition { competition } => {
                    self.handle_load_competition(competition).await
                }
            };

            debug!("network request complete");
            let is_ok = !matches!(response, NetworkResponse::MatchesLoaded { failure: Some(_), .. });
            self.stop_loading_animation(is_ok).await;

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    /// Fetch + normalize. Failures never escape: they become an empty row set
    /// plus a message scoped to this competition.
    async fn handle_load_competition(&self, competition: Competition) -> NetworkResponse {
        debug!("loading {} matches", competition.code());
        let (raw, error) = self.client.fetch_matches_or_empty(competition).await;
        let (rows, failure) = match error {
            Some(e) => (Vec::new(), Some(e.to_string())),
            None => load_rows(competition, &raw, self.policy),
        };
        NetworkResponse::MatchesLoaded { competition, rows, failure }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

/// Normalize a fetched batch. A non-empty feed that normalizes to nothing is
/// reported as a failure so the tab can say why it is empty.
fn load_rows(
    competition: Competition,
    raw: &[Value],
    policy: FailurePolicy,
) -> (Vec<MatchRow>, Option<String>) {
    let rows = normalize(competition, raw, policy);
    if rows.is_empty() && !raw.is_empty() {
        return (rows, Some(format!("{} matches could not be read", raw.len())));
    }
    if rows.len() < raw.len() {
        warn!("{}: skipped {} malformed matches", competition.code(), raw.len() - rows.len());
    }
    info!("{}: loaded {} matches", competition.code(), rows.len());
    (rows, None)
}
