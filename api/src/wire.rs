/// football-data.org v4 wire types: serde shapes for deserializing match lists.
/// Every field is optional here; `normalize` decides what a usable record needs.
/// Endpoint: https://api.football-data.org/v4/competitions/{code}/matches
use serde::Deserialize;
use serde_json::Value;

/// The envelope only. Records stay as JSON until `normalize` decodes them one
/// at a time, so a single ill-typed record cannot sink the whole response.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct MatchesResponse {
    #[serde(default)]
    pub matches: Vec<Value>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawMatch {
    pub id: Option<u64>,
    pub utc_date: Option<String>, // "2022-12-18T15:00:00Z"
    pub status: Option<String>,   // "SCHEDULED" | "TIMED" | "IN_PLAY" | "FINISHED" ...
    pub stage: Option<String>,    // "GROUP_STAGE" | "LEAGUE_STAGE" | "LAST_16" ...
    pub group: Option<String>,    // "GROUP_A", group stage only
    pub matchday: Option<u32>,
    pub home_team: Option<RawTeam>,
    pub away_team: Option<RawTeam>,
    pub score: Option<RawScore>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawTeam {
    pub id: Option<u64>,
    /// Null until a knockout slot is decided.
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub tla: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawScore {
    pub winner: Option<String>,   // "HOME_TEAM" | "AWAY_TEAM" | "DRAW"
    pub duration: Option<String>, // "REGULAR" | "EXTRA_TIME" | "PENALTY_SHOOTOUT"
    pub full_time: Option<ScorePair>,
    pub half_time: Option<ScorePair>,
    pub regular_time: Option<ScorePair>,
    pub extra_time: Option<ScorePair>,
    pub penalties: Option<ScorePair>,
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScorePair {
    pub home: Option<u16>,
    pub away: Option<u16>,
}

impl ScorePair {
    /// Both sides, or nothing.
    pub fn both(&self) -> Option<(u16, u16)> {
        Some((self.home?, self.away?))
    }
}
