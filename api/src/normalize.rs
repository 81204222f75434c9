//! Raw football-data matches → flat `MatchRow`s.
//!
//! Group/knockout competitions fold extra time into the score and carry the
//! shootout as a suffix; league/knockout competitions always show the full-time
//! score. Each record is decoded on its own, and a record that fails to decode
//! or lacks a required field is a `MalformedRecord`, handled per `FailurePolicy`.

use crate::wire::{RawMatch, RawScore, ScorePair};
use crate::{Competition, CompetitionFormat, MatchRow, ScoreCell};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub type NormalizeResult<T> = Result<T, NormalizeError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    MalformedRecord { index: usize, field: &'static str },
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::MalformedRecord { index, field } => {
                write!(f, "Malformed match #{index}: missing or invalid {field}")
            }
        }
    }
}

impl std::error::Error for NormalizeError {}

/// What to do with a batch that contains a malformed record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Drop the whole batch; the competition shows "no data".
    #[default]
    WholeBatch,
    /// Drop only the bad record.
    SkipRecord,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whole-batch" | "whole_batch" | "batch" => Ok(FailurePolicy::WholeBatch),
            "skip-record" | "skip_record" | "skip" => Ok(FailurePolicy::SkipRecord),
            other => Err(format!("unknown failure policy: {other}")),
        }
    }
}

/// Normalize one competition's match list under `policy`.
pub fn normalize(competition: Competition, raw: &[Value], policy: FailurePolicy) -> Vec<MatchRow> {
    match policy {
        FailurePolicy::WholeBatch => match normalize_all(competition, raw) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("{}: {e}; dropping all {} matches", competition.code(), raw.len());
                Vec::new()
            }
        },
        FailurePolicy::SkipRecord => raw
            .iter()
            .enumerate()
            .filter_map(|(i, m)| match map_record(competition, i, m) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!("{}: {e}; skipping record", competition.code());
                    None
                }
            })
            .collect(),
    }
}

/// Whole-batch normalization for group/knockout tournaments (World Cup).
pub fn normalize_group_knockout(raw: &[Value]) -> NormalizeResult<Vec<MatchRow>> {
    normalize_all(Competition::WorldCup, raw)
}

/// Whole-batch normalization for league/knockout tournaments (Champions League).
pub fn normalize_league_knockout(raw: &[Value]) -> NormalizeResult<Vec<MatchRow>> {
    normalize_all(Competition::ChampionsLeague, raw)
}

fn normalize_all(competition: Competition, raw: &[Value]) -> NormalizeResult<Vec<MatchRow>> {
    raw.iter()
        .enumerate()
        .map(|(i, m)| map_record(competition, i, m))
        .collect()
}

// ---------------------------------------------------------------------------
// Per-record mapping
// ---------------------------------------------------------------------------

/// Fields every format needs, validated once.
struct Common<'a> {
    date: NaiveDate,
    stage: &'a str,
    home: Option<String>,
    away: Option<String>,
    score: &'a RawScore,
    full_time: ScorePair,
}

fn common(index: usize, m: &RawMatch) -> NormalizeResult<Common<'_>> {
    let malformed = |field| NormalizeError::MalformedRecord { index, field };

    let date = m
        .utc_date
        .as_deref()
        .and_then(|d| d.get(..10))
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .ok_or_else(|| malformed("utcDate"))?;
    let stage = m.stage.as_deref().ok_or_else(|| malformed("stage"))?;
    let home = m.home_team.as_ref().ok_or_else(|| malformed("homeTeam"))?;
    let away = m.away_team.as_ref().ok_or_else(|| malformed("awayTeam"))?;
    let score = m.score.as_ref().ok_or_else(|| malformed("score"))?;
    let full_time = score.full_time.ok_or_else(|| malformed("score.fullTime"))?;

    Ok(Common {
        date,
        stage,
        home: home.name.clone(),
        away: away.name.clone(),
        score,
        full_time,
    })
}

fn resolve_winner(c: &Common<'_>, no_winner_stage: &str) -> String {
    if c.stage == no_winner_stage {
        return String::new();
    }
    let team = match c.score.winner.as_deref() {
        Some("HOME_TEAM") => c.home.as_deref(),
        Some("AWAY_TEAM") => c.away.as_deref(),
        _ => None,
    };
    team.unwrap_or_default().to_string()
}

fn map_record(competition: Competition, index: usize, value: &Value) -> NormalizeResult<MatchRow> {
    let m = RawMatch::deserialize(value).map_err(|e| {
        debug!("{} match #{index}: {e}", competition.code());
        NormalizeError::MalformedRecord { index, field: "record" }
    })?;
    let c = common(index, &m)?;

    let (group, matchday, (home_score, away_score)) = match competition.format() {
        CompetitionFormat::GroupKnockout => {
            let regular = c.stage == competition.no_winner_stage()
                || c.score.duration.as_deref().unwrap_or("REGULAR") == "REGULAR";
            let scores = if regular {
                full_time_cells(c.full_time)
            } else {
                folded_cells(index, c.score)?
            };
            (m.group.clone(), None, scores)
        }
        CompetitionFormat::LeagueKnockout => (None, m.matchday, full_time_cells(c.full_time)),
    };

    let winner = resolve_winner(&c, competition.no_winner_stage());
    Ok(MatchRow {
        date: c.date,
        stage: c.stage.to_string(),
        group,
        matchday,
        home_team: c.home,
        away_team: c.away,
        home_score,
        away_score,
        winner,
    })
}

fn full_time_cells(full_time: ScorePair) -> (ScoreCell, ScoreCell) {
    (ScoreCell::goals(full_time.home), ScoreCell::goals(full_time.away))
}

/// Regular plus extra time as the goals, with any shootout as the suffix.
fn folded_cells(index: usize, score: &RawScore) -> NormalizeResult<(ScoreCell, ScoreCell)> {
    let malformed = |field| NormalizeError::MalformedRecord { index, field };

    let (rh, ra) = score
        .regular_time
        .and_then(|p| p.both())
        .ok_or_else(|| malformed("score.regularTime"))?;
    let (eh, ea) = score
        .extra_time
        .and_then(|p| p.both())
        .ok_or_else(|| malformed("score.extraTime"))?;
    let home = rh.checked_add(eh).ok_or_else(|| malformed("score.extraTime"))?;
    let away = ra.checked_add(ea).ok_or_else(|| malformed("score.extraTime"))?;
    let shootout = score.penalties.and_then(|p| p.both());

    Ok((
        ScoreCell { goals: Some(home), penalties: shootout.map(|(h, _)| h) },
        ScoreCell { goals: Some(away), penalties: shootout.map(|(_, a)| a) },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GROUP_STAGE;
    use serde_json::json;

    fn wc_match(stage: &str, home: &str, away: &str, score: Value) -> Value {
        let group = if stage == GROUP_STAGE { json!("GROUP_A") } else { Value::Null };
        json!({
            "utcDate": "2022-12-09T15:00:00Z",
            "stage": stage,
            "group": group,
            "homeTeam": { "name": home },
            "awayTeam": { "name": away },
            "score": score,
        })
    }

    #[test]
    fn group_stage_suppresses_winner_flag() {
        let m = json!({
            "utcDate": "2022-11-21T16:00:00Z",
            "stage": "GROUP_STAGE",
            "group": "A",
            "homeTeam": { "name": "X" },
            "awayTeam": { "name": "Y" },
            "score": { "winner": "HOME_TEAM", "duration": "REGULAR", "fullTime": { "home": 2, "away": 1 } }
        });
        let rows = normalize_group_knockout(&[m]).unwrap();
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2022, 11, 21).unwrap());
        assert_eq!(r.stage, "GROUP_STAGE");
        assert_eq!(r.group.as_deref(), Some("A"));
        assert_eq!(r.home_team.as_deref(), Some("X"));
        assert_eq!(r.away_team.as_deref(), Some("Y"));
        assert_eq!(r.home_score, ScoreCell::goals(Some(2)));
        assert_eq!(r.away_score, ScoreCell::goals(Some(1)));
        assert_eq!(r.winner, "");
    }

    #[test]
    fn shootout_folds_extra_time_and_appends_penalties() {
        let m = wc_match(
            "QUARTER_FINALS",
            "Netherlands",
            "Argentina",
            json!({
                "winner": "HOME_TEAM",
                "duration": "PENALTY_SHOOTOUT",
                "fullTime": { "home": 7, "away": 5 },
                "regularTime": { "home": 1, "away": 1 },
                "extraTime": { "home": 1, "away": 0 },
                "penalties": { "home": 5, "away": 4 }
            }),
        );
        let rows = normalize_group_knockout(&[m]).unwrap();
        assert_eq!(rows[0].home_score.to_string(), "2 (5)");
        assert_eq!(rows[0].away_score.to_string(), "1 (4)");
        assert_eq!(rows[0].home_score.goals, Some(2));
        assert_eq!(rows[0].winner, "Netherlands");
    }

    #[test]
    fn extra_time_without_shootout_has_no_suffix() {
        let m = wc_match(
            "LAST_16",
            "England",
            "Senegal",
            json!({
                "winner": "AWAY_TEAM",
                "duration": "EXTRA_TIME",
                "fullTime": { "home": 1, "away": 2 },
                "regularTime": { "home": 1, "away": 1 },
                "extraTime": { "home": 0, "away": 1 }
            }),
        );
        let rows = normalize_group_knockout(&[m]).unwrap();
        assert_eq!(rows[0].home_score.to_string(), "1");
        assert_eq!(rows[0].away_score.to_string(), "2");
        assert_eq!(rows[0].winner, "Senegal");
    }

    #[test]
    fn unplayed_knockout_keeps_unset_scores_and_teams() {
        let m = json!({
            "utcDate": "2026-07-19T19:00:00Z",
            "stage": "FINAL",
            "homeTeam": { "name": null },
            "awayTeam": { "name": null },
            "score": { "winner": null, "duration": "REGULAR", "fullTime": { "home": null, "away": null } }
        });
        let rows = normalize_group_knockout(&[m]).unwrap();
        assert_eq!(rows[0].home_team, None);
        assert_eq!(rows[0].home_score, ScoreCell::default());
        assert_eq!(rows[0].winner, "");
    }

    #[test]
    fn league_stage_uses_full_time_and_keeps_matchday() {
        let m = json!({
            "utcDate": "2024-09-17T16:45:00Z",
            "stage": "LEAGUE_STAGE",
            "matchday": 1,
            "homeTeam": { "name": "Juventus" },
            "awayTeam": { "name": "PSV" },
            "score": { "winner": "HOME_TEAM", "duration": "REGULAR", "fullTime": { "home": 3, "away": 1 } }
        });
        let rows = normalize_league_knockout(&[m]).unwrap();
        assert_eq!(rows[0].matchday, Some(1));
        assert_eq!(rows[0].group, None);
        assert_eq!(rows[0].winner, "");
        assert_eq!(rows[0].home_score.to_string(), "3");
    }

    #[test]
    fn league_knockout_never_folds_penalties() {
        let m = json!({
            "utcDate": "2025-03-11T20:00:00Z",
            "stage": "LAST_16",
            "matchday": 10,
            "homeTeam": { "name": "Liverpool" },
            "awayTeam": { "name": "Paris Saint-Germain" },
            "score": {
                "winner": "AWAY_TEAM",
                "duration": "PENALTY_SHOOTOUT",
                "fullTime": { "home": 0, "away": 1 },
                "regularTime": { "home": 0, "away": 1 },
                "extraTime": { "home": 0, "away": 0 },
                "penalties": { "home": 1, "away": 4 }
            }
        });
        let rows = normalize_league_knockout(&[m]).unwrap();
        assert_eq!(rows[0].home_score.to_string(), "0");
        assert_eq!(rows[0].away_score.to_string(), "1");
        assert_eq!(rows[0].winner, "Paris Saint-Germain");
    }

    #[test]
    fn malformed_record_reports_index_and_field() {
        let good = wc_match("GROUP_STAGE", "A", "B", json!({ "fullTime": { "home": 0, "away": 0 } }));
        let bad = json!({ "utcDate": "2022-11", "stage": "GROUP_STAGE" });
        let err = normalize_group_knockout(&[good, bad]).unwrap_err();
        assert_eq!(err, NormalizeError::MalformedRecord { index: 1, field: "utcDate" });
    }

    #[test]
    fn shootout_without_regular_time_is_malformed() {
        let bad = wc_match(
            "FINAL",
            "Argentina",
            "France",
            json!({ "duration": "PENALTY_SHOOTOUT", "fullTime": { "home": 7, "away": 5 } }),
        );
        let err = normalize_group_knockout(&[bad]).unwrap_err();
        assert_eq!(err, NormalizeError::MalformedRecord { index: 0, field: "score.regularTime" });
    }

    #[test]
    fn whole_batch_policy_is_length_preserving_or_empty() {
        let good: Vec<Value> = (0..4)
            .map(|i| wc_match("GROUP_STAGE", &format!("H{i}"), &format!("A{i}"), json!({ "fullTime": { "home": i, "away": 0 } })))
            .collect();
        let rows = normalize(Competition::WorldCup, &good, FailurePolicy::WholeBatch);
        assert_eq!(rows.len(), good.len());

        let mut mixed = good.clone();
        mixed.insert(2, json!({ "stage": "GROUP_STAGE" }));
        assert!(normalize(Competition::WorldCup, &mixed, FailurePolicy::WholeBatch).is_empty());
    }

    #[test]
    fn skip_record_policy_keeps_the_rest() {
        let mut batch: Vec<Value> = (0..3)
            .map(|i| wc_match("GROUP_STAGE", &format!("H{i}"), &format!("A{i}"), json!({ "fullTime": { "home": 1, "away": 1 } })))
            .collect();
        batch.insert(1, json!({ "utcDate": "2022-11-20T16:00:00Z" }));
        let rows = normalize(Competition::WorldCup, &batch, FailurePolicy::SkipRecord);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].home_team.as_deref(), Some("H1"));
    }

    #[test]
    fn ill_typed_record_is_malformed_without_sinking_the_batch() {
        let league = |matchday: Value, home: &str| {
            json!({
                "utcDate": "2024-09-17T16:45:00Z",
                "stage": "LEAGUE_STAGE",
                "matchday": matchday,
                "homeTeam": { "name": home },
                "awayTeam": { "name": "PSV" },
                "score": { "fullTime": { "home": 3, "away": 1 } }
            })
        };
        let batch = vec![league(json!(1), "Juventus"), league(json!("1"), "Bayern"), league(json!(2), "Arsenal")];

        let err = normalize_league_knockout(&batch).unwrap_err();
        assert_eq!(err, NormalizeError::MalformedRecord { index: 1, field: "record" });

        let rows = normalize(Competition::ChampionsLeague, &batch, FailurePolicy::SkipRecord);
        let homes: Vec<_> = rows.iter().map(|r| r.home_team.as_deref().unwrap()).collect();
        assert_eq!(homes, vec!["Juventus", "Arsenal"]);
        assert!(normalize(Competition::ChampionsLeague, &batch, FailurePolicy::WholeBatch).is_empty());
    }

    #[test]
    fn negative_goals_are_malformed() {
        let bad = wc_match("GROUP_STAGE", "A", "B", json!({ "fullTime": { "home": -1, "away": 0 } }));
        let err = normalize_group_knockout(&[bad]).unwrap_err();
        assert_eq!(err, NormalizeError::MalformedRecord { index: 0, field: "record" });
    }

    #[test]
    fn extra_time_overflow_is_malformed() {
        let bad = wc_match(
            "FINAL",
            "Argentina",
            "France",
            json!({
                "duration": "EXTRA_TIME",
                "fullTime": { "home": 3, "away": 3 },
                "regularTime": { "home": 65535, "away": 2 },
                "extraTime": { "home": 1, "away": 1 }
            }),
        );
        let err = normalize_group_knockout(&[bad.clone()]).unwrap_err();
        assert_eq!(err, NormalizeError::MalformedRecord { index: 0, field: "score.extraTime" });
        assert!(normalize(Competition::WorldCup, &[bad], FailurePolicy::SkipRecord).is_empty());
    }

    #[test]
    fn empty_input_normalizes_to_empty() {
        assert!(normalize(Competition::ChampionsLeague, &[], FailurePolicy::WholeBatch).is_empty());
        assert!(normalize_group_knockout(&[]).unwrap().is_empty());
    }

    #[test]
    fn failure_policy_parses_env_spellings() {
        assert_eq!("whole-batch".parse::<FailurePolicy>(), Ok(FailurePolicy::WholeBatch));
        assert_eq!(" Skip-Record ".parse::<FailurePolicy>(), Ok(FailurePolicy::SkipRecord));
        assert!("sometimes".parse::<FailurePolicy>().is_err());
    }
}
