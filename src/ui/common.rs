//! Common UI components shared across views.
//!
//! This module contains the header bar, route bar, status bar, the
//! loading/failed placeholders, and the help overlay.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Route};
use crate::data::Classification;

/// Render the header bar with per-class counts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(summary) = app.summary() else {
        let state = if app.load_error().is_some() {
            "Load failed"
        } else {
            "Loading..."
        };
        let line = Line::from(vec![
            Span::styled(" SIGNALBOARD ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("| {}", state)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let status_style = summary
        .worst()
        .map_or(Style::default(), |class| app.theme.status_style(class));

    let count = |n: usize, class: Classification| {
        if n > 0 {
            Span::styled(n.to_string(), app.theme.status_style(class))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        }
    };

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("SIGNALBOARD ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        count(summary.success, Classification::Success),
        Span::raw(" ok "),
        count(summary.warning, Classification::Warning),
        Span::raw(" warn "),
        count(summary.error, Classification::Error),
        Span::raw(" err "),
        count(summary.undefined, Classification::Undefined),
        Span::raw(" undef "),
    ];
    if summary.unclassified > 0 {
        spans.push(count(summary.unclassified, Classification::Unclassified));
        spans.push(Span::raw(" ?? "));
    }
    spans.push(Span::raw("│ "));
    spans.push(Span::styled(
        summary.total.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::raw(match app.route {
        Route::Home => " signals",
        Route::Signal(_) => " nodes",
    }));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the current route and where the data comes from.
pub fn render_route_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(app.route.path(), app.theme.route),
        Span::styled(
            format!("  ({})", app.source_description()),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows: breadcrumb trail, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(err) = app.load_error() {
        format!(" Error: {} | r:retry Esc:back q:quit", err)
    } else if let Some(updated) = app.last_updated {
        let controls = match app.route {
            Route::Home => {
                if app.home.filter_active {
                    "Type to search | Enter:apply Esc:cancel"
                } else {
                    "/:search Enter:open r:refresh ?:help q:quit"
                }
            }
            Route::Signal(_) => "↑↓:select Enter:open Esc:back r:refresh ?:help q:quit",
        };

        format!(
            " {} | Updated {:.1}s ago | {}",
            app.breadcrumb(),
            updated.elapsed().as_secs_f64(),
            controls,
        )
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Placeholder shown while a view waits for its first response.
pub fn render_loading(frame: &mut Frame, app: &App, area: Rect, title: &str) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Loading...",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(paragraph, area);
}

/// Shown in place of a view whose fetch failed.
pub fn render_failed(frame: &mut Frame, app: &App, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.error));
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Loading failed",
            app.theme.status_style(Classification::Error),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to retry",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ↑/↓ j/k     Move selection"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter → l   Open signal"),
        Line::from("  Esc ← h     Go back"),
        Line::from("  g           Signal list"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Signal list",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  /         Start filter/search"),
        Line::from("  c         Clear filter"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Refresh"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
