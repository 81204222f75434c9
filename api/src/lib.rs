pub mod client;
pub mod normalize;
pub mod view;
pub mod wire;

use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;

pub const GROUP_STAGE: &str = "GROUP_STAGE";
pub const LEAGUE_STAGE: &str = "LEAGUE_STAGE";
/// Display name for a team slot the API has not filled yet.
pub const TBD: &str = "TBD";

// ---------------------------------------------------------------------------
// Competitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Competition {
    #[default]
    WorldCup,
    ChampionsLeague,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitionFormat {
    /// Groups of four, then single-leg knockout rounds (penalties possible).
    GroupKnockout,
    /// One league table split into match days, then two-legged ties.
    LeagueKnockout,
}

impl Competition {
    pub const ALL: [Competition; 2] = [Competition::WorldCup, Competition::ChampionsLeague];

    /// football-data.org competition code.
    pub fn code(&self) -> &'static str {
        match self {
            Competition::WorldCup => "WC",
            Competition::ChampionsLeague => "CL",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Competition::WorldCup => "FIFA World Cup",
            Competition::ChampionsLeague => "UEFA Champions League",
        }
    }

    pub fn format(&self) -> CompetitionFormat {
        match self {
            Competition::WorldCup => CompetitionFormat::GroupKnockout,
            Competition::ChampionsLeague => CompetitionFormat::LeagueKnockout,
        }
    }

    /// Stage whose matches never carry a winner (draws stand).
    pub fn no_winner_stage(&self) -> &'static str {
        match self.format() {
            CompetitionFormat::GroupKnockout => GROUP_STAGE,
            CompetitionFormat::LeagueKnockout => LEAGUE_STAGE,
        }
    }

    /// Canonical stage order with tab labels.
    pub fn stage_order(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Competition::WorldCup => &[
                (GROUP_STAGE, "Group Stage"),
                ("LAST_32", "Round of 32"),
                ("LAST_16", "Round of 16"),
                ("QUARTER_FINALS", "Quarterfinals"),
                ("SEMI_FINALS", "Semifinals"),
                ("THIRD_PLACE", "Third Place"),
                ("FINAL", "Final"),
            ],
            Competition::ChampionsLeague => &[
                (LEAGUE_STAGE, "League Stage"),
                ("PLAYOFFS", "Knockout Playoffs"),
                ("LAST_16", "Round of 16"),
                ("QUARTER_FINALS", "Quarterfinals"),
                ("SEMI_FINALS", "Semifinals"),
                ("FINAL", "Final"),
            ],
        }
    }

    pub fn stage_label(&self, code: &str) -> String {
        self.stage_order()
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| (*label).to_string())
            .unwrap_or_else(|| title_case_code(code))
    }

    /// Stages present in `rows`, in canonical order; unknown codes trail in first-seen order.
    pub fn ordered_stages(&self, rows: &[MatchRow]) -> Vec<String> {
        let present = stage_list(rows);
        let mut ordered: Vec<String> = self
            .stage_order()
            .iter()
            .filter(|(code, _)| present.iter().any(|p| p == code))
            .map(|(code, _)| (*code).to_string())
            .collect();
        for code in present {
            if !ordered.contains(&code) {
                ordered.push(code);
            }
        }
        ordered
    }
}

impl fmt::Display for Competition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// "LAST_64" -> "Last 64"
fn title_case_code(code: &str) -> String {
    code.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let lower = w.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Normalized rows, one per match
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub date: NaiveDate,
    pub stage: String,
    pub group: Option<String>,
    pub matchday: Option<u32>,
    pub home_team: Option<String>, // None = not decided yet
    pub away_team: Option<String>,
    pub home_score: ScoreCell,
    pub away_score: ScoreCell,
    /// Team name, or empty when a draw stands or the tie is undecided.
    pub winner: String,
}

impl MatchRow {
    pub fn home_name(&self) -> &str {
        self.home_team.as_deref().unwrap_or(TBD)
    }

    pub fn away_name(&self) -> &str {
        self.away_team.as_deref().unwrap_or(TBD)
    }

    pub fn is_played(&self) -> bool {
        self.home_score.goals.is_some() && self.away_score.goals.is_some()
    }

    /// Goals on the scoreboard; shootout kicks are not goals.
    pub fn total_goals(&self) -> u64 {
        u64::from(self.home_score.goals.unwrap_or(0)) + u64::from(self.away_score.goals.unwrap_or(0))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreCell {
    pub goals: Option<u16>,     // None = not played
    pub penalties: Option<u16>, // shootout kicks, shown as a suffix
}

impl ScoreCell {
    pub fn goals(goals: Option<u16>) -> Self {
        Self { goals, penalties: None }
    }
}

impl fmt::Display for ScoreCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.goals, self.penalties) {
            (Some(g), Some(p)) => write!(f, "{g} ({p})"),
            (Some(g), None) => write!(f, "{g}"),
            (None, _) => Ok(()),
        }
    }
}

/// Distinct stage codes in order of first appearance.
pub fn stage_list(rows: &[MatchRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|r| seen.insert(r.stage.as_str()))
        .map(|r| r.stage.clone())
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub fn row(date: &str, stage: &str, home: Option<&str>, away: Option<&str>) -> MatchRow {
        MatchRow {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            stage: stage.to_string(),
            group: None,
            matchday: None,
            home_team: home.map(str::to_string),
            away_team: away.map(str::to_string),
            home_score: ScoreCell::default(),
            away_score: ScoreCell::default(),
            winner: String::new(),
        }
    }

    pub fn scored(mut row: MatchRow, home: u16, away: u16) -> MatchRow {
        row.home_score = ScoreCell::goals(Some(home));
        row.away_score = ScoreCell::goals(Some(away));
        row
    }
}
