//! Detail view rendering.
//!
//! Shows one signal and, below it, its whole dependency tree as an indented
//! table.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::common;
use super::format_value;
use crate::app::{App, DetailState, LoadState};
use crate::data::{Classified, SignalView};

/// Render the detail view for the current `/signal/:id` route.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref detail) = app.detail else {
        return;
    };

    let signal = match detail.signal {
        LoadState::Loading => return common::render_loading(frame, app, area, &detail.id),
        LoadState::Failed(ref msg) => {
            return common::render_failed(frame, app, area, &detail.id, msg)
        }
        LoadState::Loaded(ref signal) => signal,
    };

    let chunks = Layout::vertical([
        Constraint::Length(5), // Header with signal info
        Constraint::Min(4),    // Dependency tree
    ])
    .split(area);

    render_header(frame, app, signal, chunks[0]);
    render_tree(frame, app, signal, detail, chunks[1]);
}

fn render_header(frame: &mut Frame, app: &App, signal: &SignalView, area: Rect) {
    let class = signal.classification();
    let status_style = app.theme.status_style(class);

    let header_lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", signal.label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                signal.id.as_deref().map(|id| format!("({})", id)).unwrap_or_default(),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Value: "),
            Span::styled(format_value(signal), status_style.add_modifier(Modifier::BOLD)),
            Span::raw("    Status: "),
            Span::styled(
                format!("{} {}", class.symbol(), class.label()),
                status_style.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Dependencies: "),
            Span::styled(
                signal.dependencies().len().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let block = Block::default()
        .title(" Signal Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(header_lines).block(block), area);
}

fn render_tree(
    frame: &mut Frame,
    app: &App,
    root: &SignalView,
    detail: &DetailState,
    area: Rect,
) {
    let nodes = root.walk();

    if nodes.len() == 1 {
        let block = Block::default()
            .title(" Dependencies (0) ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border));
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No dependencies",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Signal"),
        Cell::from("Value"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = nodes
        .iter()
        .map(|(depth, node)| {
            let class = node.classification();
            let status_style = app.theme.status_style(class);
            let branch = if *depth == 0 {
                String::new()
            } else {
                format!("{}└ ", "  ".repeat(depth - 1))
            };
            Row::new(vec![
                Cell::from(format!("{}{}", branch, node.label())),
                Cell::from(format_value(*node)).style(status_style),
                Cell::from(class.symbol()).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),    // Signal (indented)
        Constraint::Length(10), // Value
        Constraint::Length(8),  // Status
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Dependency tree ({} nodes) ", nodes.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default()
        .with_offset(detail.scroll_offset.get())
        .with_selected(Some(detail.selected.min(nodes.len() - 1)));

    frame.render_stateful_widget(table, area, &mut state);
    detail.scroll_offset.set(state.offset());
}
