//! Stage view builders: one stage's `MatchRow`s → a presentation tree.
//!
//! Builders are pure; the UI may cache their output per (competition, stage).

use crate::{Competition, CompetitionFormat, GROUP_STAGE, LEAGUE_STAGE, MatchRow};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Presentation tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageView {
    /// The stage has no matches (yet, or the load failed).
    NoData { code: String, label: String },
    Stage(StagePanel),
}

impl StageView {
    pub fn label(&self) -> &str {
        match self {
            StageView::NoData { label, .. } => label,
            StageView::Stage(panel) => &panel.label,
        }
    }

    pub fn panel(&self) -> Option<&StagePanel> {
        match self {
            StageView::NoData { .. } => None,
            StageView::Stage(panel) => Some(panel),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePanel {
    pub code: String,
    pub label: String,
    pub sections: Vec<Section>,
    /// Full results table for the stage; absent when sections already carry tables.
    pub table: Option<ResultsTable>,
    pub chart: GoalsChart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    TeamList(Vec<String>),
    /// One line per match: "Home vs. Away" or "Home 2 - 1 Away".
    Fixtures(Vec<String>),
    Table(ResultsTable),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Group,
    HomeTeam,
    HomeScore,
    AwayScore,
    AwayTeam,
    Winner,
}

impl Column {
    pub fn title(&self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Group => "Group",
            Column::HomeTeam => "Home Team",
            Column::HomeScore => "Home Score",
            Column::AwayScore => "Away Score",
            Column::AwayTeam => "Away Team",
            Column::Winner => "Winner",
        }
    }

    fn cell(&self, row: &MatchRow) -> String {
        match self {
            Column::Date => row.date.format("%Y-%m-%d").to_string(),
            Column::Group => row.group.clone().unwrap_or_default(),
            Column::HomeTeam => row.home_name().to_string(),
            Column::HomeScore => row.home_score.to_string(),
            Column::AwayScore => row.away_score.to_string(),
            Column::AwayTeam => row.away_name().to_string(),
            Column::Winner => row.winner.clone(),
        }
    }
}

const GROUP_COLUMNS: [Column; 6] = [
    Column::Date,
    Column::Group,
    Column::HomeTeam,
    Column::HomeScore,
    Column::AwayScore,
    Column::AwayTeam,
];

const MATCH_COLUMNS: [Column; 5] = [
    Column::Date,
    Column::HomeTeam,
    Column::HomeScore,
    Column::AwayScore,
    Column::AwayTeam,
];

const KNOCKOUT_COLUMNS: [Column; 6] = [
    Column::Date,
    Column::HomeTeam,
    Column::HomeScore,
    Column::AwayScore,
    Column::AwayTeam,
    Column::Winner,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl ResultsTable {
    fn build(columns: &[Column], rows: &[&MatchRow]) -> Self {
        Self {
            columns: columns.to_vec(),
            rows: rows
                .iter()
                .map(|r| columns.iter().map(|c| c.cell(r)).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalsChart {
    pub title: String,
    pub bars: Vec<(String, u64)>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the view for `code` using the rules of the competition's format.
pub fn build_stage_view(competition: Competition, rows: &[MatchRow], code: &str, label: &str) -> StageView {
    match competition.format() {
        CompetitionFormat::GroupKnockout => build_group_knockout_view(rows, code, label),
        CompetitionFormat::LeagueKnockout => build_league_knockout_view(rows, code, label),
    }
}

fn stage_rows<'a>(rows: &'a [MatchRow], code: &str) -> Vec<&'a MatchRow> {
    rows.iter().filter(|r| r.stage == code).collect()
}

fn no_data(code: &str, label: &str) -> StageView {
    StageView::NoData { code: code.to_string(), label: label.to_string() }
}

/// World Cup style: team lists per group, or a fixture list per knockout round.
pub fn build_group_knockout_view(rows: &[MatchRow], code: &str, label: &str) -> StageView {
    let mut stage = stage_rows(rows, code);
    if stage.is_empty() {
        return no_data(code, label);
    }

    let panel = if code == GROUP_STAGE {
        // Ungrouped rows go last. sort_by is stable: equal (group, date) keys
        // keep feed order.
        stage.sort_by(|a, b| {
            (a.group.is_none(), &a.group)
                .cmp(&(b.group.is_none(), &b.group))
                .then(a.date.cmp(&b.date))
        });

        let mut groups: Vec<&str> = Vec::new();
        let mut memberships: Vec<(&str, &str)> = Vec::new();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        for r in &stage {
            let group = group_label(r);
            if !groups.contains(&group) {
                groups.push(group);
            }
            for team in [r.home_name(), r.away_name()] {
                if seen.insert((team, group)) {
                    memberships.push((team, group));
                }
            }
        }

        let sections = groups
            .iter()
            .map(|g| Section {
                title: (*g).to_string(),
                body: SectionBody::TeamList(
                    memberships
                        .iter()
                        .filter(|(_, mg)| mg == g)
                        .map(|(team, _)| (*team).to_string())
                        .collect(),
                ),
            })
            .collect();

        let bars = groups
            .iter()
            .map(|g| {
                let goals = stage.iter().filter(|r| group_label(r) == *g).map(|r| r.total_goals()).sum::<u64>();
                ((*g).to_string(), goals)
            })
            .collect();

        StagePanel {
            code: code.to_string(),
            label: label.to_string(),
            sections,
            table: Some(ResultsTable::build(&GROUP_COLUMNS, &stage)),
            chart: GoalsChart { title: "Total Goals by Group".to_string(), bars },
        }
    } else {
        stage.sort_by(|a, b| a.date.cmp(&b.date));

        let fixtures = stage
            .iter()
            .map(|r| format!("{} vs. {}", r.home_name(), r.away_name()))
            .collect();
        let bars = stage
            .iter()
            .map(|r| (format!("{} vs {}", r.home_name(), r.away_name()), r.total_goals()))
            .collect();

        StagePanel {
            code: code.to_string(),
            label: label.to_string(),
            sections: vec![Section { title: "GAMES".to_string(), body: SectionBody::Fixtures(fixtures) }],
            table: Some(ResultsTable::build(&KNOCKOUT_COLUMNS, &stage)),
            chart: GoalsChart { title: format!("Goals per Match - {label}"), bars },
        }
    };

    StageView::Stage(panel)
}

/// Champions League style: one table per match day, or head-to-head series per tie.
pub fn build_league_knockout_view(rows: &[MatchRow], code: &str, label: &str) -> StageView {
    let mut stage = stage_rows(rows, code);
    if stage.is_empty() {
        return no_data(code, label);
    }
    stage.sort_by(|a, b| a.stage.cmp(&b.stage).then(a.date.cmp(&b.date)));

    let panel = if code == LEAGUE_STAGE {
        let mut matchdays: Vec<u32> = Vec::new();
        for md in stage.iter().filter_map(|r| r.matchday) {
            if !matchdays.contains(&md) {
                matchdays.push(md);
            }
        }
        let mut partitions: Vec<(String, Vec<&MatchRow>)> = matchdays
            .iter()
            .map(|md| {
                let day = stage.iter().copied().filter(|r| r.matchday == Some(*md)).collect();
                (format!("Match Day {md}"), day)
            })
            .collect();
        let unscheduled: Vec<&MatchRow> = stage.iter().copied().filter(|r| r.matchday.is_none()).collect();
        if !unscheduled.is_empty() {
            partitions.push(("Unscheduled".to_string(), unscheduled));
        }

        let bars = partitions
            .iter()
            .map(|(title, day)| {
                let short = title.replace("Match Day ", "MD");
                (short, day.iter().map(|r| r.total_goals()).sum::<u64>())
            })
            .collect();
        let sections = partitions
            .into_iter()
            .map(|(title, day)| Section {
                title,
                body: SectionBody::Table(ResultsTable::build(&MATCH_COLUMNS, &day)),
            })
            .collect();

        StagePanel {
            code: code.to_string(),
            label: label.to_string(),
            sections,
            table: None,
            chart: GoalsChart { title: "Goals per Match Day".to_string(), bars },
        }
    } else {
        let series = head_to_head(&stage);

        let bars = series
            .iter()
            .map(|s| (s.title.clone(), s.legs.iter().map(|r| r.total_goals()).sum::<u64>()))
            .collect();
        let sections = series
            .iter()
            .map(|s| Section {
                title: s.title.clone(),
                body: SectionBody::Fixtures(s.legs.iter().map(|r| leg_line(r)).collect()),
            })
            .collect();

        StagePanel {
            code: code.to_string(),
            label: label.to_string(),
            sections,
            table: Some(ResultsTable::build(&KNOCKOUT_COLUMNS, &stage)),
            chart: GoalsChart { title: "Goals per Tie".to_string(), bars },
        }
    };

    StageView::Stage(panel)
}

fn group_label(row: &MatchRow) -> &str {
    row.group.as_deref().unwrap_or("Ungrouped")
}

fn leg_line(row: &MatchRow) -> String {
    if row.is_played() {
        format!("{} {} - {} {}", row.home_name(), row.home_score, row.away_score, row.away_name())
    } else {
        format!("{} vs. {}", row.home_name(), row.away_name())
    }
}

// ---------------------------------------------------------------------------
// Head-to-head series
// ---------------------------------------------------------------------------

struct Series<'a> {
    title: String,
    legs: Vec<&'a MatchRow>,
}

/// Unordered pair key: "A vs B" and "B vs A" land on the same series.
fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

fn row_pair(row: &MatchRow) -> Option<(&str, &str)> {
    Some(canonical_pair(row.home_team.as_deref()?, row.away_team.as_deref()?))
}

/// Pairings come from each distinct home team's first match; legs with an
/// undecided team never join a series.
fn head_to_head<'a>(stage: &[&'a MatchRow]) -> Vec<Series<'a>> {
    let mut seen_home: HashSet<&str> = HashSet::new();
    let mut keys: Vec<((&str, &str), String)> = Vec::new();

    for r in stage {
        let Some(home) = r.home_team.as_deref() else {
            continue;
        };
        if !seen_home.insert(home) {
            continue;
        }
        let Some(away) = r.away_team.as_deref() else {
            continue;
        };
        let key = canonical_pair(home, away);
        if !keys.iter().any(|(k, _)| *k == key) {
            keys.push((key, format!("{home} vs {away}")));
        }
    }

    keys.into_iter()
        .map(|(key, title)| Series {
            title,
            legs: stage.iter().copied().filter(|r| row_pair(r) == Some(key)).collect(),
        })
        .collect()
}
