use football_data_api::view::{Column, GoalsChart, ResultsTable, Section, SectionBody, StagePanel};
use tui::buffer::Buffer;
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::Line;
use tui::widgets::{Bar, BarChart, BarGroup, Paragraph, Row, Table, Widget};

use crate::draw::default_border;

/// Below this width the chart goes under the sections instead of beside them.
const SIDE_BY_SIDE_MIN_WIDTH: u16 = 100;
const CHART_HEIGHT: u16 = 12;

/// One stage: its sections stacked top to bottom, then the full results
/// table when the stage has one, with the goals chart alongside.
pub struct StagePanelView<'a> {
    pub panel: &'a StagePanel,
    /// Sections before this index are scrolled off the top.
    pub first_section: usize,
    /// Results rows scrolled off the top. Non-zero hides every section.
    pub table_offset: usize,
}

impl<'a> Widget for StagePanelView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 3 {
            return;
        }

        let (body, chart) = if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
            let [body, chart] =
                Layout::horizontal([Constraint::Fill(3), Constraint::Fill(2)]).areas(area);
            (body, chart)
        } else {
            let chart_height = CHART_HEIGHT.min(area.height / 2);
            let [body, chart] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(chart_height)]).areas(area);
            (body, chart)
        };

        render_sections(self.panel, self.first_section, self.table_offset, body, buf);
        GoalsChartView { chart: &self.panel.chart }.render(chart, buf);
    }
}

fn render_sections(panel: &StagePanel, first_section: usize, table_offset: usize, area: Rect, buf: &mut Buffer) {
    let bottom = area.y + area.height;
    let mut y = area.y;

    let table_offset = panel.table.as_ref().map_or(0, |t| table_offset.min(t.rows.len().saturating_sub(1)));
    let first_section = if table_offset > 0 { panel.sections.len() } else { first_section };

    let sections = panel.sections.iter().skip(first_section);
    let results = panel.table.as_ref().map(|table| Section {
        title: "Results".to_string(),
        body: SectionBody::Table(ResultsTable {
            columns: table.columns.clone(),
            rows: table.rows.iter().skip(table_offset).cloned().collect(),
        }),
    });

    for section in sections.chain(results.iter()) {
        if y >= bottom {
            break;
        }
        let height = section_height(section).min(bottom - y);
        let rect = Rect::new(area.x, y, area.width, height);
        render_section(section, rect, buf);
        y += height;
    }

    let hint = if table_offset > 0 {
        Some(format!("↑ {table_offset} rows"))
    } else if first_section > 0 {
        Some(format!("↑ {first_section} more"))
    } else {
        None
    };
    if let Some(hint) = hint
        && area.height > 0
    {
        buf.set_string(
            area.x + area.width.saturating_sub(hint.chars().count() as u16 + 2),
            area.y,
            hint,
            Style::default().fg(Color::DarkGray),
        );
    }
}

/// Rows a section needs, borders included.
fn section_height(section: &Section) -> u16 {
    let content = match &section.body {
        SectionBody::TeamList(items) | SectionBody::Fixtures(items) => items.len(),
        SectionBody::Table(table) => table.rows.len() + 1,
    };
    (content as u16).saturating_add(2)
}

fn render_section(section: &Section, area: Rect, buf: &mut Buffer) {
    let block = default_border(Color::White).title(format!(" {} ", section.title));
    match &section.body {
        SectionBody::TeamList(teams) => {
            let lines: Vec<Line> = teams.iter().map(|t| Line::from(t.as_str())).collect();
            Paragraph::new(lines).block(block).render(area, buf);
        }
        SectionBody::Fixtures(fixtures) => {
            let lines: Vec<Line> = fixtures.iter().map(|f| Line::from(f.as_str())).collect();
            Paragraph::new(lines).block(block).render(area, buf);
        }
        SectionBody::Table(table) => results_table(table).block(block).render(area, buf),
    }
}

fn results_table(table: &ResultsTable) -> Table<'_> {
    let header = Row::new(table.columns.iter().map(|c| c.title()))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = table
        .rows
        .iter()
        .map(|cells| Row::new(cells.iter().map(String::as_str)));
    let widths: Vec<Constraint> = table.columns.iter().map(column_width).collect();

    Table::new(rows, widths).header(header).column_spacing(1)
}

fn column_width(column: &Column) -> Constraint {
    match column {
        Column::Date => Constraint::Length(10),
        Column::Group => Constraint::Length(9),
        Column::HomeScore | Column::AwayScore => Constraint::Length(10),
        Column::HomeTeam | Column::AwayTeam | Column::Winner => Constraint::Fill(1),
    }
}

struct GoalsChartView<'a> {
    chart: &'a GoalsChart,
}

impl<'a> Widget for GoalsChartView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = default_border(Color::DarkGray).title(format!(" {} ", self.chart.title));
        if self.chart.bars.is_empty() {
            Paragraph::new("No goals recorded")
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .render(area, buf);
            return;
        }

        let bars: Vec<Bar> = self
            .chart
            .bars
            .iter()
            .map(|(label, goals)| {
                Bar::default()
                    .value(*goals)
                    .label(Line::from(label.as_str()))
                    .style(Style::default().fg(Color::Green))
            })
            .collect();

        BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .render(area, buf);
    }
}
