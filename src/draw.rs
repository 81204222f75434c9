use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::Line;
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, MenuItem};
use crate::components::stage_view::StagePanelView;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use football_data_api::Competition;
use football_data_api::view::StageView;

static TABS: &[&str; 2] = &["World Cup", "Champions League"];

const HELP_LINES: &[&str] = &[
    "1 / 2        World Cup / Champions League",
    "h l  ← →     previous / next stage",
    "j k  ↓ ↑     scroll sections, then results rows",
    "PgDn PgUp    page through results rows",
    "r            reload the current competition",
    "f            toggle full screen",
    "\"            toggle log pane",
    "?  Esc       show / close this help",
    "q            quit",
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::WorldCup | MenuItem::ChampionsLeague => draw_competition(f, &layout, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::WorldCup => 0,
        MenuItem::ChampionsLeague => 1,
        MenuItem::Help => match app.state.previous_tab {
            MenuItem::ChampionsLeague => 1,
            _ => 0,
        },
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let updated = app
        .current_competition()
        .and_then(|c| app.state.data(c))
        .and_then(|d| d.loaded_at)
        .map(|t| format!("{}  Help: ? ", t.format("%H:%M")))
        .unwrap_or_else(|| "Help: ? ".to_string());
    let help = Paragraph::new(updated)
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Stage tabs across the top, then the selected stage.
fn draw_competition(f: &mut Frame, layout: &LayoutAreas, app: &mut App) {
    let Some(competition) = app.current_competition() else {
        draw_placeholder(f, layout.main, "Press 1 or 2 to pick a competition");
        return;
    };

    let Some(data) = app.state.data(competition).filter(|d| d.is_loaded()) else {
        draw_placeholder(f, layout.main, "Loading...");
        return;
    };
    if let Some(err) = data.failure.as_deref() {
        draw_placeholder(f, layout.main, &format!("Error loading data: {err}"));
        return;
    }
    if data.stages.is_empty() {
        draw_placeholder(f, layout.main, "No data available");
        return;
    }

    draw_stage_tabs(f, layout.stage_bar, app, competition);

    let first_section = app.state.section_index;
    let table_offset = app.state.table_offset;
    match app.current_view() {
        Some(StageView::Stage(panel)) => f.render_widget(
            StagePanelView { panel, first_section, table_offset },
            layout.stage_main,
        ),
        Some(StageView::NoData { label, .. }) => draw_placeholder(
            f,
            layout.stage_main,
            &format!("No data available for {label}"),
        ),
        None => draw_placeholder(f, layout.stage_main, "No data available"),
    }
}

fn draw_stage_tabs(f: &mut Frame, area: Rect, app: &App, competition: Competition) {
    let Some(data) = app.state.data(competition) else {
        return;
    };
    let titles: Vec<Line> = data
        .stages
        .iter()
        .map(|code| Line::from(competition.stage_label(code)))
        .collect();
    let tabs = Tabs::new(titles)
        .block(default_border(Color::DarkGray).title(format!(" {} ", competition.name())))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .select(app.state.selection.stage_index().unwrap_or(0))
        .style(Style::default().fg(Color::White));
    f.render_widget(tabs, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = HELP_LINES.iter().map(|l| Line::from(*l)).collect();
    f.render_widget(
        Paragraph::new(lines).block(default_border(Color::White).title(" Help ")),
        area,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .output_separator(' ')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::White))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
