use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use room_dashboard::app::{export_records, App};
use room_dashboard::data::{map_for_chart, TimeLabeler};
use room_dashboard::feed::{HttpFeed, SensorFeed};
use room_dashboard::query::QueryClient;
use room_dashboard::ui::{self, Labels, Language, Theme, ThemeChoice};
use room_dashboard::{events, Settings};

#[derive(Parser, Debug)]
#[command(name = "room-dashboard")]
#[command(about = "Terminal dashboard for room temperature and humidity")]
struct Args {
    /// Path to a TOML config file (default: ./room-dashboard.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refetch on a timer (e.g., "30s", "5m"); refresh is on demand when unset
    #[arg(short, long)]
    refresh: Option<String>,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,

    /// Label language
    #[arg(long, value_enum)]
    lang: Option<Language>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch once, export the records to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(refresh) = args.refresh {
        settings.refresh_interval = Some(refresh);
    }
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }
    if let Some(lang) = args.lang {
        settings.language = lang;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = Some(log_file);
    }
    settings.validate()?;

    if let Some(ref path) = settings.log_file {
        init_logging(path)?;
    }

    // Fetches run here while the UI loop owns the main thread
    let runtime = tokio::runtime::Runtime::new()?;
    let feed = Arc::new(HttpFeed::new());
    let labels = Labels::for_language(settings.language);

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return export_to_file(&runtime, feed.as_ref(), &labels, &export_path);
    }

    let client = QueryClient::new(runtime.handle().clone(), settings.query_options()?);
    let app = App::new(client, feed)
        .with_theme(Theme::from_choice(settings.theme))
        .with_labels(labels)
        .with_chart_settings(settings.chart_settings());

    run_tui(app)
}

/// Send tracing output to `path`; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "room-dashboard starting");
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableFocusChange);
        original_hook(panic);
    }));

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    app.shutdown();
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        app.tick();
        let screen = app.screen();

        // Draw UI
        terminal.draw(|frame| {
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
                let top = (area.height / 2).saturating_sub(2);
                let centered = Rect::new(0, top, area.width, 5u16.min(area.height - top));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Title
                Constraint::Length(1), // Subtitle
                Constraint::Min(12),   // Charts
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_subtitle(frame, app, chunks[1]);
            ui::dashboard::render(frame, &screen, &app.theme, chunks[2]);
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            events::handle_event(app, event);
        }
    }

    Ok(())
}

/// Fetch the readings once and write them to a JSON file
fn export_to_file(
    runtime: &tokio::runtime::Runtime,
    feed: &dyn SensorFeed,
    labels: &Labels,
    export_path: &Path,
) -> Result<()> {
    let readings = runtime
        .block_on(feed.fetch_readings())
        .with_context(|| format!("Failed to fetch readings from {}", feed.description()))?;

    let records = map_for_chart(&readings, &TimeLabeler::local());
    export_records(&records, labels, export_path)?;

    println!(
        "Exported {} records to: {}",
        records.len(),
        export_path.display()
    );
    Ok(())
}
