//! Home view rendering.
//!
//! Displays the status table of every signal returned by `/api/signal/all`.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::common;
use super::format_value;
use crate::app::{App, LoadState};
use crate::data::Classified;

/// Render the status table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let all = match app.home.signals {
        LoadState::Loading => return common::render_loading(frame, app, area, "Signals"),
        LoadState::Failed(ref msg) => {
            return common::render_failed(frame, app, area, "Signals", msg)
        }
        LoadState::Loaded(ref signals) => signals,
    };

    let signals = app.home.filtered();

    let header = Row::new(vec![
        Cell::from("Signal"),
        Cell::from("Id"),
        Cell::from("Value"),
        Cell::from("Deps"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = signals
        .iter()
        .map(|s| {
            let class = s.classification();
            let status_style = app.theme.status_style(class);
            Row::new(vec![
                Cell::from(s.label().to_string()),
                Cell::from(s.id.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(format_value(*s)).style(status_style),
                Cell::from(if s.has_dependencies() {
                    s.dependencies().len().to_string()
                } else {
                    "-".to_string()
                }),
                Cell::from(class.symbol()).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),   // Signal - gets 3x share (largest)
        Constraint::Fill(2),   // Id
        Constraint::Length(10), // Value
        Constraint::Length(6), // Deps
        Constraint::Min(7),    // Status
    ];

    let selected_visual_index = app.home.selected.min(signals.len().saturating_sub(1));

    // Build title with filter info
    let filter_info = if app.home.filter_active {
        format!(" /{}_", app.home.filter_text)
    } else if !app.home.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.home.filter_text)
    } else {
        String::new()
    };

    // Show scroll position if there are items
    let position_info = if !signals.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, signals.len())
    } else {
        String::new()
    };

    let title = format!(
        " Signals ({}/{}){}{} ",
        signals.len(),
        all.len(),
        filter_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_offset(app.home.scroll_offset.get());
    if !signals.is_empty() {
        state.select(Some(selected_visual_index));
    }

    frame.render_stateful_widget(table, area, &mut state);
    app.home.scroll_offset.set(state.offset());
}
