use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use signalboard::data::build_views;
use signalboard::source::{load_signals, FileSource, HttpSource, SignalClient, SignalSource};
use signalboard::ui::{self, Theme};
use signalboard::{events, export, App, Route, Settings};

#[derive(Parser, Debug)]
#[command(name = "signalboard")]
#[command(about = "Terminal dashboard for service health signals")]
struct Args {
    /// Base URL of the signal API (overrides config)
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Read signals from a local JSON file instead of the API
    #[arg(short, long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial route: "/" or "/signal/<id>"
    #[arg(short, long, default_value = "/")]
    route: Route,

    /// HTTP request timeout in seconds (overrides config)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Write logs to this file (overrides config)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Export all signals to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(url) = args.url {
        settings.base_url = url;
    }
    if let Some(timeout) = args.timeout {
        settings.timeout_secs = timeout;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = Some(log_file);
    }
    settings.validate().context("invalid command-line options")?;

    if let Some(ref path) = settings.log_file {
        init_logging(path)?;
    }

    let runtime = tokio::runtime::Runtime::new()?;

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return export_to_file(&runtime, &settings, args.file.as_deref(), &export_path);
    }

    let source: Box<dyn SignalSource> = match args.file {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(HttpSource::new(build_client(&settings)?, runtime.handle().clone())),
    };
    info!(source = source.description(), route = %args.route, "starting dashboard");

    let theme = Theme::from_choice(settings.theme);
    run_tui(source, theme, args.route)
}

/// Send tracing output to `path`. The terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_client(settings: &Settings) -> Result<SignalClient> {
    let client = SignalClient::builder()
        .endpoint(&settings.base_url)
        .timeout(settings.timeout())
        .build()?;
    Ok(client)
}

/// Run the TUI with the given signal source
fn run_tui(source: Box<dyn SignalSource>, theme: Theme, route: Route) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(source, theme, route);

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.poll_source();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    let header_row = ui::list_header_row(&app.route);
                    events::handle_mouse_event(app, mouse, header_row);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Fetch every signal once and write the decorated export.
fn export_to_file(
    runtime: &tokio::runtime::Runtime,
    settings: &Settings,
    file: Option<&Path>,
    export_path: &Path,
) -> Result<()> {
    let raw = match file {
        Some(path) => load_signals(path)?,
        None => {
            let client = build_client(settings)?;
            runtime
                .block_on(client.fetch_all())
                .with_context(|| format!("failed to fetch signals from {}", client.endpoint()))?
        }
    };

    let signals = build_views(raw);
    export::write_json(export_path, &export::signals_report(&signals))?;

    println!(
        "Exported {} signals to: {}",
        signals.len(),
        export_path.display()
    );
    Ok(())
}
