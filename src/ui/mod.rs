//! Terminal UI rendering using ratatui.
//!
//! Each route is rendered by its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`home`]: Status table of all signals (`/`)
//! - [`detail`]: One signal and its dependency tree (`/signal/:id`)
//! - [`common`]: Shared components (header, route bar, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Route (common::render_route_bar)     │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (home/detail::render)                │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlay rendered on top:
//!    - common::render_help
//! ```

pub mod common;
pub mod detail;
pub mod home;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Route};
use crate::data::{Classified, FormattedValue};

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 12;

/// Screen row of the content area's top border.
pub const CONTENT_START_ROW: u16 = 2;

/// Screen row of the selectable table's header line for `route`.
///
/// Rows below it map to list items for mouse selection.
pub fn list_header_row(route: &Route) -> u16 {
    match route {
        Route::Home => CONTENT_START_ROW + 1,
        // Below the five-line signal header block
        Route::Signal(_) => CONTENT_START_ROW + 5 + 1,
    }
}

/// Value cell text: `"75%"` or `"Undefined"`.
pub fn format_value<S: Classified>(signal: &S) -> String {
    match signal.formatted_value() {
        FormattedValue::Percent(p) => format!("{}%", p),
        undefined => undefined.to_string(),
    }
}

/// Draw one full frame for the current app state.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Check for minimum terminal size
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
        frame.render_widget(paragraph, centered.intersection(area));
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Route
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_route_bar(frame, app, chunks[1]);

    match app.route {
        Route::Home => home::render(frame, app, chunks[2]),
        Route::Signal(_) => detail::render(frame, app, chunks[2]),
    }

    common::render_status_bar(frame, app, chunks[3]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChannelSource, Payload, Request};
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_home_renders_rows() {
        let (backend, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), Theme::dark(), Route::Home);
        let raw = serde_json::from_str(
            r#"[{"id":"api","name":"Gateway","value":0.75},{"id":"queue","value":null}]"#,
        )
        .unwrap();
        backend.respond(Request::All, Ok(Payload::List(raw)));
        app.poll_source();

        let text = render(&app);
        assert!(text.contains("Gateway"));
        assert!(text.contains("75%"));
        assert!(text.contains("Undefined"));
        assert!(text.contains("WARN"));
    }

    #[test]
    fn test_failed_state_rendered() {
        let (backend, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), Theme::dark(), Route::Signal("db".into()));
        backend.respond(
            Request::Full { id: "db".into() },
            Err(crate::source::SourceError::NotFound("db".into())),
        );
        app.poll_source();

        let text = render(&app);
        assert!(text.contains("Loading failed"));
        assert!(text.contains("Signal 'db' not found"));
    }

    #[test]
    fn test_detail_renders_tree() {
        let (backend, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), Theme::dark(), Route::Signal("api".into()));
        let raw = serde_json::from_str(
            r#"{"id":"api","value":1,"dependencies":[{"id":"db","value":0.5}]}"#,
        )
        .unwrap();
        backend.respond(Request::Full { id: "api".into() }, Ok(Payload::Signal(raw)));
        app.poll_source();

        let text = render(&app);
        assert!(text.contains("Signal Detail"));
        assert!(text.contains("└ db"));
        assert!(text.contains("50%"));
        assert!(text.contains("ERR"));
    }

    fn click(row: u16) -> crossterm::event::MouseEvent {
        use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_click_after_scroll_selects_shown_row() {
        let (backend, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), Theme::dark(), Route::Home);
        let raw = (0..30)
            .map(|i| serde_json::from_value(serde_json::json!({ "id": format!("s{:02}", i) })))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        backend.respond(Request::All, Ok(Payload::List(raw)));
        app.poll_source();

        app.select_last();
        let text = render(&app);
        // 14 data rows fit, so the last one scrolls the table by 16
        assert_eq!(app.home.scroll_offset.get(), 16);
        assert!(text.lines().nth(4).unwrap().contains("s16"));

        let header_row = list_header_row(&app.route);
        crate::events::handle_mouse_event(&mut app, click(4), header_row);
        assert_eq!(app.selected_signal().unwrap().id.as_deref(), Some("s16"));

        // Offset is kept while the selection stays visible
        render(&app);
        assert_eq!(app.home.scroll_offset.get(), 16);
        let header_row = list_header_row(&app.route);
        crate::events::handle_mouse_event(&mut app, click(6), header_row);
        assert_eq!(app.selected_signal().unwrap().id.as_deref(), Some("s18"));
    }

    #[test]
    fn test_detail_click_after_scroll() {
        let (backend, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), Theme::dark(), Route::Signal("root".into()));
        let deps: Vec<_> = (0..20)
            .map(|i| serde_json::json!({ "id": format!("d{:02}", i) }))
            .collect();
        let raw = serde_json::from_value(serde_json::json!({ "id": "root", "dependencies": deps }))
            .unwrap();
        backend.respond(Request::Full { id: "root".into() }, Ok(Payload::Signal(raw)));
        app.poll_source();

        app.select_last();
        render(&app);
        // 21 nodes, 9 visible rows
        assert_eq!(app.detail.as_ref().unwrap().scroll_offset.get(), 12);

        let header = list_header_row(&app.route);
        crate::events::handle_mouse_event(&mut app, click(header + 1), header);
        let (_, node) = app.selected_node().unwrap();
        assert_eq!(node.id.as_deref(), Some("d11"));
    }

    #[test]
    fn test_list_header_row() {
        assert_eq!(list_header_row(&Route::Home), 3);
        assert_eq!(list_header_row(&Route::Signal("x".into())), 8);
    }

    #[test]
    fn test_format_value() {
        let raw: crate::data::RawSignal = serde_json::from_str(r#"{"value": 0.42}"#).unwrap();
        assert_eq!(format_value(&raw), "42%");
        assert_eq!(format_value(&crate::data::RawSignal::default()), "Undefined");
    }
}
