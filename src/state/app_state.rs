use crate::app::MenuItem;
use crate::state::view_cache::StageViewCache;
use chrono::{DateTime, Local};
use football_data_api::view::StageView;
use football_data_api::{Competition, MatchRow};
use std::collections::HashMap;

/// Results rows moved per page key.
pub const TABLE_PAGE: usize = 10;

// ---------------------------------------------------------------------------
// Per-competition data
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CompetitionData {
    pub rows: Vec<MatchRow>,
    /// Stage codes present in `rows`, in display order.
    pub stages: Vec<String>,
    /// Why the last load came back empty, if it failed.
    pub failure: Option<String>,
    /// None until the first response arrives.
    pub loaded_at: Option<DateTime<Local>>,
}

impl CompetitionData {
    fn replace(&mut self, competition: Competition, rows: Vec<MatchRow>, failure: Option<String>) {
        self.stages = competition.ordered_stages(&rows);
        self.rows = rows;
        self.failure = failure;
        self.loaded_at = Some(Local::now());
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// What the main pane is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    /// A competition with no stage to show yet.
    Competition(Competition),
    Stage { competition: Competition, index: usize },
}

impl Selection {
    pub fn competition(&self) -> Option<Competition> {
        match *self {
            Selection::None => None,
            Selection::Competition(c) | Selection::Stage { competition: c, .. } => Some(c),
        }
    }

    pub fn stage_index(&self) -> Option<usize> {
        match *self {
            Selection::Stage { index, .. } => Some(index),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub selection: Selection,
    /// First section drawn in the stage pane.
    pub section_index: usize,
    /// Results rows scrolled off the top, once the last section is reached.
    pub table_offset: usize,
    pub competitions: HashMap<Competition, CompetitionData>,
    pub cache: StageViewCache,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self, competition: Competition) -> Option<&CompetitionData> {
        self.competitions.get(&competition)
    }

    fn stage_count(&self, competition: Competition) -> usize {
        self.data(competition).map_or(0, |d| d.stages.len())
    }

    /// Replace a competition's rows and drop its cached views. A selection on
    /// that competition is kept where possible.
    pub fn store_rows(&mut self, competition: Competition, rows: Vec<MatchRow>, failure: Option<String>) {
        self.competitions
            .entry(competition)
            .or_default()
            .replace(competition, rows, failure);
        self.cache.invalidate(competition);

        let count = self.stage_count(competition);
        self.selection = match self.selection {
            Selection::Competition(c) | Selection::Stage { competition: c, .. }
                if c == competition && count == 0 =>
            {
                Selection::Competition(c)
            }
            Selection::Competition(c) if c == competition => {
                Selection::Stage { competition: c, index: 0 }
            }
            Selection::Stage { competition: c, index } if c == competition => {
                Selection::Stage { competition: c, index: index.min(count - 1) }
            }
            other => other,
        };
        if self.selection.competition() == Some(competition) {
            self.reset_scroll();
        }
    }

    pub fn select_competition(&mut self, competition: Competition) {
        if self.selection.competition() == Some(competition) {
            return;
        }
        self.selection = if self.stage_count(competition) > 0 {
            Selection::Stage { competition, index: 0 }
        } else {
            Selection::Competition(competition)
        };
        self.reset_scroll();
    }

    pub fn next_stage(&mut self) {
        let Some(competition) = self.selection.competition() else {
            return;
        };
        let count = self.stage_count(competition);
        let next = match self.selection {
            Selection::Stage { index, .. } if index + 1 < count => index + 1,
            Selection::Stage { .. } => return,
            _ if count > 0 => 0,
            _ => return,
        };
        self.selection = Selection::Stage { competition, index: next };
        self.reset_scroll();
    }

    pub fn prev_stage(&mut self) {
        if let Selection::Stage { competition, index } = self.selection
            && index > 0
        {
            self.selection = Selection::Stage { competition, index: index - 1 };
            self.reset_scroll();
        }
    }

    fn reset_scroll(&mut self) {
        self.section_index = 0;
        self.table_offset = 0;
    }

    /// Section and results row counts of the selected stage.
    fn scroll_extent(&mut self) -> (usize, usize) {
        self.current_view().and_then(StageView::panel).map_or((0, 0), |p| {
            (p.sections.len(), p.table.as_ref().map_or(0, |t| t.rows.len()))
        })
    }

    /// Scroll down one section; past the last one, one results row.
    pub fn next_section(&mut self) {
        let (sections, rows) = self.scroll_extent();
        if self.section_index + 1 < sections {
            self.section_index += 1;
        } else if self.table_offset + 1 < rows {
            self.table_offset += 1;
        }
    }

    pub fn prev_section(&mut self) {
        if self.table_offset > 0 {
            self.table_offset -= 1;
        } else {
            self.section_index = self.section_index.saturating_sub(1);
        }
    }

    pub fn next_table_page(&mut self) {
        let (sections, rows) = self.scroll_extent();
        if rows == 0 {
            return;
        }
        self.section_index = sections.saturating_sub(1);
        self.table_offset = (self.table_offset + TABLE_PAGE).min(rows - 1);
    }

    pub fn prev_table_page(&mut self) {
        self.table_offset = self.table_offset.saturating_sub(TABLE_PAGE);
    }

    /// Build, or fetch from the cache, the view for the selected stage.
    pub fn current_view(&mut self) -> Option<&StageView> {
        let Selection::Stage { competition, index } = self.selection else {
            return None;
        };
        let data = self.competitions.get(&competition)?;
        let code = data.stages.get(index)?;
        let label = competition.stage_label(code);
        Some(self.cache.get_or_build(competition, &data.rows, code, &label))
    }
}
