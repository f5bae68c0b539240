use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use pokegallery_core::{Config, PokeApi, QueryController, RecordSource, SearchStrategy, config_file};
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod action;
mod app;
mod backend;
mod input;
mod theme;
mod tui_event;
mod view;

use app::App;

/// PokéGallery TUI: browse and search the Pokémon catalog in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Catalog API root (default: https://pokeapi.co/api/v2)
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// How search text is resolved: "direct" or "substring"
    #[arg(long)]
    strategy: Option<SearchStrategy>,

    /// Color theme: classic (default) or night
    #[arg(long)]
    theme: Option<String>,
}

/// `<data_dir>/pokegallery/logs`, created on demand.
fn log_dir() -> Option<PathBuf> {
    let dir = dirs::data_local_dir()?.join("pokegallery").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Log to a daily file; the terminal belongs to the UI. The guard must live
/// until exit so buffered lines are flushed.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = log_dir()?;
    let appender = tracing_appender::rolling::daily(dir, "pokegallery-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = init_logging();

    // Resolve config from CLI flags > env vars > config files > defaults
    let mut config = Config::from_file(&config_file::load_config()).with_env();
    if let Some(url) = args.base_url {
        config.base_url = url;
    }
    if let Some(secs) = args.timeout {
        config.timeout_secs = secs;
    }
    if let Some(strategy) = args.strategy {
        config.search_strategy = strategy;
    }
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    tracing::info!(base_url = %config.base_url, strategy = %config.search_strategy, "starting");

    let source: Arc<dyn RecordSource> = Arc::new(PokeApi::from_config(&config)?);
    let controller = QueryController::new(source, &config);
    let executor = controller.executor();
    let mut app = App::new(controller, theme::Theme::from_name(&config.theme));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    app.backend_cmd_tx = Some(cmd_tx);
    tokio::spawn(backend::run_command_loop(
        executor,
        cmd_rx,
        event_tx,
        cancel.clone(),
    ));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    app.start();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| app.view(f))?;

        // Wake for the next tick or the pending search commit, whichever is first
        let timeout = app.next_wakeup(
            Instant::now(),
            tick_rate.saturating_sub(last_tick.elapsed()),
        );

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(timeout).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let action = input::map_event(&evt, app.input_mode, app.screen);
                        app.update(action);
                    }
                }
            } => {}
        }

        app.poll_debounce(Instant::now());

        if last_tick.elapsed() >= tick_rate {
            app.update(action::Action::Tick);
            last_tick = Instant::now();
        }

        if app.should_quit || cancel.is_cancelled() {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
