use crate::Competition;
use crate::wire::MatchesResponse;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "https://api.football-data.org/v4";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const AUTH_HEADER: &str = "X-Auth-Token";

/// Where and how to reach football-data.org.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Sent as `X-Auth-Token`; anonymous requests are heavily rate limited.
    pub token: Option<String>,
    pub world_cup_url: Option<String>,
    pub champions_league_url: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            world_cup_url: None,
            champions_league_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let timeout_secs = get("FOOTBALL_DATA_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);

        Self {
            base_url: get("FOOTBALL_DATA_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            token: get("FOOTBALL_DATA_TOKEN"),
            world_cup_url: get("FOOTBALL_DATA_WC_URL"),
            champions_league_url: get("FOOTBALL_DATA_CL_URL"),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn matches_url(&self, competition: Competition) -> String {
        let override_url = match competition {
            Competition::WorldCup => self.world_cup_url.as_ref(),
            Competition::ChampionsLeague => self.champions_league_url.as_ref(),
        };
        override_url
            .cloned()
            .unwrap_or_else(|| format!("{}/competitions/{}/matches", self.base_url, competition.code()))
    }
}

/// football-data.org client. One request per competition, at most one retry.
#[derive(Debug, Clone)]
pub struct FootballDataApi {
    client: Client,
    config: ApiConfig,
}

impl Default for FootballDataApi {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(StatusCode, String),
    Parsing(serde_json::Error, String),
}

impl ApiError {
    /// Transport failures and server errors are worth one more try.
    fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(..) => true,
            ApiError::Api(status, _) => status.is_server_error(),
            ApiError::Parsing(..) => false,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(status, url) => write!(f, "API error for {url}: HTTP {status}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl FootballDataApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("footdash/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    /// Fetch the raw match list for a competition. Records are left undecoded.
    pub async fn fetch_matches(&self, competition: Competition) -> ApiResult<Vec<Value>> {
        let url = self.config.matches_url(competition);
        let raw = match self.get::<MatchesResponse>(&url).await {
            Err(e) if e.is_retryable() => {
                debug!("retrying {url} after: {e}");
                self.get::<MatchesResponse>(&url).await?
            }
            other => other?,
        };
        debug!("{}: {} matches", competition.code(), raw.matches.len());
        Ok(raw.matches)
    }

    /// Fetch, degrading any failure to an empty list. The error, if any, is
    /// handed back alongside so the caller can show it.
    pub async fn fetch_matches_or_empty(&self, competition: Competition) -> (Vec<Value>, Option<ApiError>) {
        match self.fetch_matches(competition).await {
            Ok(matches) => (matches, None),
            Err(e) => {
                warn!("{}: {e}", competition.code());
                (Vec::new(), Some(e))
            }
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let mut request = self.client.get(url).timeout(self.config.timeout);
        if let Some(token) = self.config.token.as_deref() {
            request = request.header(AUTH_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Api(status, url.to_owned()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;
        serde_json::from_slice::<T>(&body).map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{FailurePolicy, normalize};
    use std::collections::HashMap;

    const TWO_MATCHES: &str = r#"{
        "count": 2,
        "matches": [
            {
                "id": 391881,
                "utcDate": "2022-11-20T16:00:00Z",
                "status": "FINISHED",
                "stage": "GROUP_STAGE",
                "group": "GROUP_A",
                "homeTeam": { "id": 8030, "name": "Qatar" },
                "awayTeam": { "id": 791, "name": "Ecuador" },
                "score": { "winner": "AWAY_TEAM", "duration": "REGULAR", "fullTime": { "home": 0, "away": 2 } }
            },
            {
                "id": 391882,
                "utcDate": "2022-11-21T16:00:00Z",
                "status": "FINISHED",
                "stage": "GROUP_STAGE",
                "group": "GROUP_B",
                "homeTeam": { "id": 770, "name": "England" },
                "awayTeam": { "id": 8019, "name": "Iran" },
                "score": { "winner": "HOME_TEAM", "duration": "REGULAR", "fullTime": { "home": 6, "away": 2 } }
            }
        ]
    }"#;

    fn api_for(server: &mockito::Server, token: Option<&str>) -> FootballDataApi {
        FootballDataApi::new(ApiConfig {
            base_url: server.url(),
            token: token.map(str::to_string),
            ..ApiConfig::default()
        })
    }

    #[test]
    fn config_reads_lookup_and_ignores_blanks() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("FOOTBALL_DATA_BASE_URL", "http://localhost:9000/v4/"),
            ("FOOTBALL_DATA_TOKEN", "  "),
            ("FOOTBALL_DATA_CL_URL", "http://mirror/cl.json"),
            ("FOOTBALL_DATA_TIMEOUT_SECS", "999"),
        ]);
        let config = ApiConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.base_url, "http://localhost:9000/v4");
        assert_eq!(config.token, None);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(
            config.matches_url(Competition::WorldCup),
            "http://localhost:9000/v4/competitions/WC/matches"
        );
        assert_eq!(config.matches_url(Competition::ChampionsLeague), "http://mirror/cl.json");
    }

    #[test]
    fn config_defaults_without_env() {
        assert_eq!(ApiConfig::from_lookup(|_| None), ApiConfig::default());
    }

    #[tokio::test]
    async fn fetches_matches_with_token_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/competitions/WC/matches")
            .match_header("X-Auth-Token", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(TWO_MATCHES)
            .create_async()
            .await;

        let matches = api_for(&server, Some("secret"))
            .fetch_matches(Competition::WorldCup)
            .await
            .unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1]["homeTeam"]["name"], "England");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_retried_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/competitions/CL/matches")
            .with_status(503)
            .expect(2)
            .create_async()
            .await;

        let api = api_for(&server, None);
        let err = api.fetch_matches(Competition::ChampionsLeague).await.unwrap_err();
        assert!(matches!(err, ApiError::Api(status, _) if status == StatusCode::SERVICE_UNAVAILABLE));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_error_is_not_retried_and_degrades_to_empty() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/competitions/WC/matches")
            .with_status(403)
            .expect(1)
            .create_async()
            .await;

        let (matches, err) = api_for(&server, Some("expired")).fetch_matches_or_empty(Competition::WorldCup).await;
        assert!(matches.is_empty());
        assert!(matches!(err, Some(ApiError::Api(status, _)) if status == StatusCode::FORBIDDEN));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/competitions/WC/matches")
            .with_status(200)
            .with_body("{ \"matches\": [ { ")
            .create_async()
            .await;

        let api = api_for(&server, None);
        let err = api.fetch_matches(Competition::WorldCup).await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)));
        let (matches, err) = api.fetch_matches_or_empty(Competition::WorldCup).await;
        assert!(matches.is_empty());
        assert!(matches!(err, Some(ApiError::Parsing(..))));
    }

    #[tokio::test]
    async fn missing_matches_key_is_an_empty_list() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/competitions/CL/matches")
            .with_status(200)
            .with_body(r#"{ "count": 0, "resultSet": {} }"#)
            .create_async()
            .await;

        let matches = api_for(&server, None).fetch_matches(Competition::ChampionsLeague).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_degrades_to_empty() {
        let api = FootballDataApi::new(ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
            ..ApiConfig::default()
        });
        let (matches, err) = api.fetch_matches_or_empty(Competition::WorldCup).await;
        assert!(matches.is_empty());
        assert!(matches!(err, Some(ApiError::Network(..))));
    }

    #[tokio::test]
    async fn one_ill_typed_record_only_costs_that_record() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/competitions/CL/matches")
            .with_status(200)
            .with_body(
                r#"{ "matches": [
                    {
                        "utcDate": "2024-09-17T16:45:00Z",
                        "stage": "LEAGUE_STAGE",
                        "matchday": 1,
                        "homeTeam": { "name": "Juventus" },
                        "awayTeam": { "name": "PSV" },
                        "score": { "fullTime": { "home": 3, "away": 1 } }
                    },
                    {
                        "utcDate": "2024-09-17T19:00:00Z",
                        "stage": "LEAGUE_STAGE",
                        "matchday": "1",
                        "homeTeam": { "name": "Young Boys" },
                        "awayTeam": { "name": "Aston Villa" },
                        "score": { "fullTime": { "home": 0, "away": 3 } }
                    }
                ] }"#,
            )
            .create_async()
            .await;

        let (matches, err) = api_for(&server, None).fetch_matches_or_empty(Competition::ChampionsLeague).await;
        assert!(err.is_none());
        assert_eq!(matches.len(), 2);

        let rows = normalize(Competition::ChampionsLeague, &matches, FailurePolicy::SkipRecord);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].home_team.as_deref(), Some("Juventus"));
        assert!(normalize(Competition::ChampionsLeague, &matches, FailurePolicy::WholeBatch).is_empty());
    }
}
