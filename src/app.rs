//! Application state, routing and navigation logic.

use std::cell::Cell;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::data::{build_views, SignalSummary, SignalView};
use crate::export;
use crate::source::{Completion, Payload, Request, SignalSource};
use crate::ui::Theme;

/// A location in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: status table of all signals.
    Home,
    /// `/signal/:id`: one signal and its dependency chain.
    Signal(String),
}

impl Route {
    /// Parse `/` or `/signal/:id`. A single trailing slash is ignored.
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.strip_suffix('/').unwrap_or(path);
        if trimmed.is_empty() {
            return Ok(Route::Home);
        }
        if let Some(id) = trimmed.strip_prefix("/signal/") {
            if !id.is_empty() && !id.contains('/') {
                return Ok(Route::Signal(id.to_string()));
            }
        }
        bail!("Unknown route: {}", path)
    }

    /// Render back to a path.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Signal(id) => format!("/signal/{}", id),
        }
    }

    /// The fetch this route needs on entry.
    pub fn request(&self) -> Request {
        match self {
            Route::Home => Request::All,
            Route::Signal(id) => Request::Full { id: id.clone() },
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Route::parse(s)
    }
}

/// Loading state of a view's data.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    /// The last fetch failed with this message.
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// State of the home (signal list) view.
#[derive(Debug, Clone)]
pub struct HomeState {
    pub signals: LoadState<Vec<SignalView>>,
    /// Visual index into the filtered list.
    pub selected: usize,
    pub filter_text: String,
    pub filter_active: bool,
    /// First visible row, as of the last draw.
    pub scroll_offset: Cell<usize>,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            signals: LoadState::Loading,
            selected: 0,
            filter_text: String::new(),
            filter_active: false,
            scroll_offset: Cell::new(0),
        }
    }
}

impl HomeState {
    /// Check if a signal matches the current filter.
    pub fn matches_filter(&self, signal: &SignalView) -> bool {
        signal.matches(&self.filter_text)
    }

    /// Loaded signals after applying the filter, in API order.
    pub fn filtered(&self) -> Vec<&SignalView> {
        self.signals
            .loaded()
            .map(|signals| signals.iter().filter(|s| self.matches_filter(s)).collect())
            .unwrap_or_default()
    }
}

/// State of the detail view for one signal.
#[derive(Debug, Clone)]
pub struct DetailState {
    /// The id from the route.
    pub id: String,
    pub signal: LoadState<SignalView>,
    /// Index into the depth-first tree listing (0 is the root).
    pub selected: usize,
    /// First visible tree row, as of the last draw.
    pub scroll_offset: Cell<usize>,
}

impl DetailState {
    fn new(id: String) -> Self {
        Self {
            id,
            signal: LoadState::Loading,
            selected: 0,
            scroll_offset: Cell::new(0),
        }
    }

    fn node_count(&self) -> usize {
        self.signal.loaded().map_or(0, |s| s.walk().len())
    }
}

/// Main application state.
///
/// Built once at startup with its source and torn down with
/// [`App::shutdown`].
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Routing
    pub route: Route,
    pub history: Vec<Route>,

    // Data source
    source: Box<dyn SignalSource>,
    pub last_updated: Option<Instant>,

    // Per-view state
    pub home: HomeState,
    pub detail: Option<DetailState>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the app on `route` and issue that route's fetch.
    pub fn new(source: Box<dyn SignalSource>, theme: Theme, route: Route) -> Self {
        let mut app = Self {
            running: true,
            show_help: false,
            route: Route::Home,
            history: Vec::new(),
            source,
            last_updated: None,
            home: HomeState::default(),
            detail: None,
            theme,
            status_message: None,
        };
        app.enter(route);
        app
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Replace the current view with a fresh one for `route` and fetch its data.
    fn enter(&mut self, route: Route) {
        info!(route = %route, "entering route");
        match route {
            Route::Home => {
                self.home = HomeState::default();
                self.detail = None;
            }
            Route::Signal(ref id) => {
                self.detail = Some(DetailState::new(id.clone()));
            }
        }
        self.source.request(route.request());
        self.route = route;
    }

    /// Navigate to `route`, remembering the current one for [`App::go_back`].
    ///
    /// Entering a different route or changing the signal id issues exactly one
    /// fetch. Returns false (and fetches nothing) if `route` is already shown.
    pub fn navigate(&mut self, route: Route) -> bool {
        if route == self.route {
            return false;
        }
        let previous = std::mem::replace(&mut self.route, Route::Home);
        self.history.push(previous);
        self.enter(route);
        true
    }

    /// Navigate back: close help first, then pop history, then go home.
    pub fn go_back(&mut self) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        if let Some(previous) = self.history.pop() {
            self.enter(previous);
        } else if self.route != Route::Home {
            self.enter(Route::Home);
        }
    }

    /// Re-fetch the current route's data, keeping what is shown until it
    /// arrives.
    pub fn refresh(&mut self) {
        debug!(route = %self.route, "manual refresh");
        self.source.request(self.route.request());
        self.set_status_message(format!("Refreshing {}...", self.route.request()));
    }

    /// Apply every completion the source has ready.
    ///
    /// Returns true if any view state changed.
    pub fn poll_source(&mut self) -> bool {
        let mut changed = false;
        while let Some(completion) = self.source.poll() {
            changed |= self.apply(completion);
        }
        changed
    }

    /// Apply one completion to the view it belongs to.
    ///
    /// Completions for a view that is no longer shown are dropped. Among
    /// completions for the shown view the last one to arrive wins.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let Completion { request, result } = completion;

        match (&request, &self.route) {
            (Request::All, Route::Home) => {
                self.home.signals = match result {
                    Ok(Payload::List(raw)) => LoadState::Loaded(build_views(raw)),
                    Ok(Payload::Signal(_)) => {
                        LoadState::Failed("unexpected single signal for list".to_string())
                    }
                    Err(e) => LoadState::Failed(e.to_string()),
                };
                let count = self.home.filtered().len();
                self.home.selected = self.home.selected.min(count.saturating_sub(1));
            }
            (Request::Full { .. }, Route::Signal(_)) => {
                let Some(detail) = self.detail.as_mut() else {
                    return false;
                };
                detail.signal = match result {
                    Ok(Payload::Signal(raw)) => LoadState::Loaded(SignalView::from_raw(raw)),
                    Ok(Payload::List(_)) => {
                        LoadState::Failed("unexpected list for single signal".to_string())
                    }
                    Err(e) => LoadState::Failed(e.to_string()),
                };
                detail.selected = detail.selected.min(detail.node_count().saturating_sub(1));
            }
            _ => {
                debug!(%request, route = %self.route, "dropping completion for inactive view");
                return false;
            }
        }

        self.last_updated = Some(Instant::now());
        true
    }

    /// Error message of the current view's last fetch, if it failed.
    pub fn load_error(&self) -> Option<&str> {
        match self.route {
            Route::Home => self.home.signals.error(),
            Route::Signal(_) => self.detail.as_ref().and_then(|d| d.signal.error()),
        }
    }

    /// Per-class counts for the header bar.
    pub fn summary(&self) -> Option<SignalSummary> {
        match self.route {
            Route::Home => self.home.signals.loaded().map(|s| SignalSummary::from_signals(s)),
            Route::Signal(_) => self
                .detail
                .as_ref()
                .and_then(|d| d.signal.loaded())
                .map(SignalSummary::from_tree),
        }
    }

    /// Get breadcrumb trail for current navigation.
    pub fn breadcrumb(&self) -> String {
        let mut parts: Vec<String> = self.history.iter().map(Route::path).collect();
        parts.push(self.route.path());
        parts.join(" > ")
    }

    fn item_count(&self) -> usize {
        match self.route {
            Route::Home => self.home.filtered().len(),
            Route::Signal(_) => self.detail.as_ref().map_or(0, DetailState::node_count),
        }
    }

    fn selected_mut(&mut self) -> Option<&mut usize> {
        match self.route {
            Route::Home => Some(&mut self.home.selected),
            Route::Signal(_) => self.detail.as_mut().map(|d| &mut d.selected),
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.item_count().saturating_sub(1);
        if let Some(selected) = self.selected_mut() {
            *selected = (*selected + n).min(max);
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        if let Some(selected) = self.selected_mut() {
            *selected = selected.saturating_sub(n);
        }
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        if let Some(selected) = self.selected_mut() {
            *selected = 0;
        }
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let last = self.item_count().saturating_sub(1);
        if let Some(selected) = self.selected_mut() {
            *selected = last;
        }
    }

    /// Select the item shown on visible row `row` of the current table,
    /// ignoring rows past the end.
    pub fn select_visible_row(&mut self, row: usize) {
        let offset = match self.route {
            Route::Home => self.home.scroll_offset.get(),
            Route::Signal(_) => self.detail.as_ref().map_or(0, |d| d.scroll_offset.get()),
        };
        self.select_index(offset + row);
    }

    /// Select an item by its index in the current list, ignoring indexes
    /// past the end.
    pub fn select_index(&mut self, index: usize) {
        if index < self.item_count() {
            if let Some(selected) = self.selected_mut() {
                *selected = index;
            }
        }
    }

    /// The signal under the cursor in the home view.
    pub fn selected_signal(&self) -> Option<&SignalView> {
        self.home.filtered().get(self.home.selected).copied()
    }

    /// The `(depth, node)` under the cursor in the detail view.
    pub fn selected_node(&self) -> Option<(usize, &SignalView)> {
        let detail = self.detail.as_ref()?;
        let root = detail.signal.loaded()?;
        root.walk().get(detail.selected).copied()
    }

    /// Open the selected signal's detail view.
    ///
    /// In the home view this is the selected row; in the detail view it is the
    /// selected dependency (the root is already shown).
    pub fn open_selected(&mut self) {
        let target = match self.route {
            Route::Home => self.selected_signal().map(|s| s.id.clone()),
            Route::Signal(_) => match self.selected_node() {
                Some((depth, node)) if depth > 0 => Some(node.id.clone()),
                _ => None,
            },
        };

        match target {
            Some(Some(id)) => {
                let route = Route::Signal(id.clone());
                // Only ids that survive a path round trip are routable
                if Route::parse(&route.path()).ok().as_ref() == Some(&route) {
                    self.navigate(route);
                } else {
                    self.set_status_message(format!("Cannot open signal '{}'", id));
                }
            }
            Some(None) => self.set_status_message("Signal has no id".to_string()),
            None => {}
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        if self.route == Route::Home {
            self.home.filter_active = true;
        }
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.home.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.home.filter_text.clear();
        self.home.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.home.filter_text.push(c);
        self.home.selected = 0;
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.home.filter_text.pop();
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Stop background fetches. The app is not usable afterwards.
    pub fn shutdown(&mut self) {
        info!("shutting down");
        self.running = false;
        self.source.shutdown();
    }

    /// Export the current view's data to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let report = match self.route {
            Route::Home => match self.home.signals.loaded() {
                Some(signals) => export::signals_report(signals),
                None => bail!("No data to export"),
            },
            Route::Signal(_) => match self.detail.as_ref().and_then(|d| d.signal.loaded()) {
                Some(signal) => export::signal_report(signal),
                None => bail!("No data to export"),
            },
        };
        export::write_json(path, &report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawSignal;
    use crate::source::{ChannelBackend, ChannelSource, SourceError};

    fn app_at(route: Route) -> (ChannelBackend, App) {
        let (backend, source) = ChannelSource::create("test");
        let app = App::new(Box::new(source), Theme::dark(), route);
        (backend, app)
    }

    fn list(json: &str) -> Payload {
        Payload::List(serde_json::from_str(json).unwrap())
    }

    fn single(json: &str) -> Payload {
        Payload::Signal(serde_json::from_str::<RawSignal>(json).unwrap())
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/").unwrap(), Route::Home);
        assert_eq!(Route::parse("").unwrap(), Route::Home);
        assert_eq!(Route::parse("/signal/db").unwrap(), Route::Signal("db".into()));
        assert_eq!(Route::parse("/signal/db/").unwrap(), Route::Signal("db".into()));
        assert!(Route::parse("/signal/").is_err());
        assert!(Route::parse("/signal/a/b").is_err());
        assert!(Route::parse("/signals").is_err());
        assert!("/other".parse::<Route>().is_err());
    }

    #[test]
    fn test_route_path_round_trip() {
        for route in [Route::Home, Route::Signal("api-1".into())] {
            assert_eq!(Route::parse(&route.path()).unwrap(), route);
        }
        assert_eq!(Route::Signal("x".into()).to_string(), "/signal/x");
    }

    #[test]
    fn test_new_fetches_initial_route() {
        let (mut backend, app) = app_at(Route::Home);
        assert_eq!(backend.pending_requests(), vec![Request::All]);
        assert!(app.home.signals.is_loading());

        let (mut backend, app) = app_at(Route::Signal("db".into()));
        assert_eq!(backend.pending_requests(), vec![Request::Full { id: "db".into() }]);
        assert_eq!(app.detail.as_ref().unwrap().id, "db");
    }

    #[test]
    fn test_navigate_fetches_once_per_change() {
        let (mut backend, mut app) = app_at(Route::Home);
        backend.pending_requests();

        assert!(app.navigate(Route::Signal("a".into())));
        assert_eq!(backend.pending_requests(), vec![Request::Full { id: "a".into() }]);

        // Same route again: nothing
        assert!(!app.navigate(Route::Signal("a".into())));
        assert!(backend.pending_requests().is_empty());

        // Param change: one fetch
        assert!(app.navigate(Route::Signal("b".into())));
        assert_eq!(backend.pending_requests(), vec![Request::Full { id: "b".into() }]);
        assert_eq!(app.breadcrumb(), "/ > /signal/a > /signal/b");
    }

    #[test]
    fn test_go_back_refetches_previous_route() {
        let (mut backend, mut app) = app_at(Route::Home);
        app.navigate(Route::Signal("a".into()));
        backend.pending_requests();

        app.go_back();
        assert_eq!(app.route, Route::Home);
        assert!(app.detail.is_none());
        assert_eq!(backend.pending_requests(), vec![Request::All]);

        // Nothing left in history and already home
        app.go_back();
        assert!(backend.pending_requests().is_empty());
    }

    #[test]
    fn test_go_back_without_history_goes_home() {
        let (mut backend, mut app) = app_at(Route::Signal("a".into()));
        backend.pending_requests();
        app.go_back();
        assert_eq!(app.route, Route::Home);
        assert_eq!(backend.pending_requests(), vec![Request::All]);
    }

    #[test]
    fn test_list_response_replaces_state() {
        let (backend, mut app) = app_at(Route::Home);
        backend.respond(Request::All, Ok(list(r#"[{"id":"a","value":1},{"id":"b","value":0.2}]"#)));
        assert!(app.poll_source());
        assert_eq!(app.home.signals.loaded().unwrap().len(), 2);
        assert!(app.last_updated.is_some());

        app.select_last();
        assert_eq!(app.home.selected, 1);

        backend.respond(Request::All, Ok(list(r#"[{"id":"c","value":0.9}]"#)));
        app.poll_source();
        let signals = app.home.signals.loaded().unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].id.as_deref(), Some("c"));
        // Selection clamped to the new list
        assert_eq!(app.home.selected, 0);
    }

    #[test]
    fn test_failure_sets_failed_state() {
        let (backend, mut app) = app_at(Route::Home);
        backend.respond(Request::All, Err(SourceError::Status(500)));
        app.poll_source();
        assert_eq!(app.load_error(), Some("API returned status 500"));
        assert!(app.summary().is_none());
    }

    #[test]
    fn test_refresh_keeps_data_until_arrival() {
        let (mut backend, mut app) = app_at(Route::Home);
        backend.respond(Request::All, Ok(list(r#"[{"id":"a","value":1}]"#)));
        app.poll_source();
        backend.pending_requests();

        app.refresh();
        assert_eq!(backend.pending_requests(), vec![Request::All]);
        assert!(app.home.signals.loaded().is_some());
        assert!(app.get_status_message().is_some());
    }

    #[test]
    fn test_last_arrival_wins_for_detail() {
        let (backend, mut app) = app_at(Route::Home);
        app.navigate(Route::Signal("a".into()));
        app.navigate(Route::Signal("b".into()));

        // "b" answers first, stale "a" arrives last
        backend.respond(Request::Full { id: "b".into() }, Ok(single(r#"{"id":"b","value":1}"#)));
        backend.respond(Request::Full { id: "a".into() }, Ok(single(r#"{"id":"a","value":0.1}"#)));
        app.poll_source();

        let shown = app.detail.as_ref().unwrap().signal.loaded().unwrap();
        assert_eq!(shown.id.as_deref(), Some("a"));
    }

    #[test]
    fn test_completion_for_inactive_view_dropped() {
        let (backend, mut app) = app_at(Route::Home);
        app.navigate(Route::Signal("a".into()));

        backend.respond(Request::All, Ok(list(r#"[{"id":"x"}]"#)));
        assert!(!app.poll_source());
        assert!(app.home.signals.is_loading());
    }

    #[test]
    fn test_detail_tree_navigation() {
        let (mut backend, mut app) = app_at(Route::Signal("api".into()));
        backend.respond(
            Request::Full { id: "api".into() },
            Ok(single(
                r#"{"id":"api","value":0.8,"dependencies":[
                    {"id":"db","value":0.4,"dependencies":[{"id":"disk","value":1}]},
                    {"name":"anonymous","value":1}
                ]}"#,
            )),
        );
        app.poll_source();
        assert_eq!(app.summary().unwrap().total, 4);
        backend.pending_requests();

        // Root selected: Enter does nothing
        app.open_selected();
        assert!(backend.pending_requests().is_empty());

        app.select_next();
        app.select_next();
        assert_eq!(app.selected_node().map(|(d, s)| (d, s.label())), Some((2, "disk")));

        app.select_last();
        app.open_selected();
        assert_eq!(app.get_status_message(), Some("Signal has no id"));

        app.select_prev();
        app.open_selected();
        assert_eq!(app.route, Route::Signal("disk".into()));
        assert_eq!(backend.pending_requests(), vec![Request::Full { id: "disk".into() }]);
    }

    #[test]
    fn test_unroutable_ids_are_not_opened() {
        let (mut backend, mut app) = app_at(Route::Home);
        backend.respond(Request::All, Ok(list(r#"[{"id":"a/b"},{"id":""},{"id":"ok"}]"#)));
        app.poll_source();
        backend.pending_requests();

        app.open_selected();
        assert_eq!(app.route, Route::Home);
        assert_eq!(app.get_status_message(), Some("Cannot open signal 'a/b'"));

        app.select_next();
        app.open_selected();
        assert_eq!(app.route, Route::Home);
        assert_eq!(app.get_status_message(), Some("Cannot open signal ''"));
        assert!(backend.pending_requests().is_empty());

        app.select_next();
        app.open_selected();
        assert_eq!(app.route, Route::Signal("ok".into()));
    }

    #[test]
    fn test_filter_and_open_from_home() {
        let (mut backend, mut app) = app_at(Route::Home);
        backend.respond(
            Request::All,
            Ok(list(r#"[{"id":"api","name":"API"},{"id":"db","name":"Database"}]"#)),
        );
        app.poll_source();
        backend.pending_requests();

        app.start_filter();
        for c in "data".chars() {
            app.filter_push(c);
        }
        assert_eq!(app.home.filtered().len(), 1);
        app.cancel_filter();

        app.open_selected();
        assert_eq!(app.route, Route::Signal("db".into()));
        assert_eq!(backend.pending_requests(), vec![Request::Full { id: "db".into() }]);
    }

    #[test]
    fn test_export_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        let (backend, mut app) = app_at(Route::Home);
        assert!(app.export_state(&path).is_err());

        backend.respond(Request::All, Ok(list(r#"[{"id":"a","value":0.6}]"#)));
        app.poll_source();
        app.export_state(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["signals"][0]["formatted_value"], 60);
    }

    #[test]
    fn test_shutdown_stops_app() {
        let (_backend, mut app) = app_at(Route::Home);
        app.shutdown();
        assert!(!app.running);
    }
}
