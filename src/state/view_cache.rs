use football_data_api::view::{StageView, build_stage_view};
use football_data_api::{Competition, MatchRow};
use log::debug;
use std::collections::HashMap;

/// Built stage views, keyed by competition and stage code.
///
/// A view is a pure function of the rows, so an entry stays valid until that
/// competition's rows are replaced.
#[derive(Debug, Default)]
pub struct StageViewCache {
    views: HashMap<(Competition, String), StageView>,
}

impl StageViewCache {
    pub fn get_or_build(
        &mut self,
        competition: Competition,
        rows: &[MatchRow],
        code: &str,
        label: &str,
    ) -> &StageView {
        self.views
            .entry((competition, code.to_string()))
            .or_insert_with(|| {
                debug!("building {} view for {code}", competition.code());
                build_stage_view(competition, rows, code, label)
            })
    }

    pub fn invalidate(&mut self, competition: Competition) {
        let before = self.len();
        self.views.retain(|(c, _), _| *c != competition);
        debug!("dropped {} cached {} views", before - self.len(), competition.code());
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }
}
