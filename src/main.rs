use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use steamwatch::app::App;
use steamwatch::coordinator::{BootOptions, Coordinator};
use steamwatch::messages::{self, ViewEvent};
use steamwatch::worker::WorkerSupervisor;
use steamwatch::{events, ui};

#[derive(Parser, Debug)]
#[command(name = "steamwatch")]
#[command(about = "A TUI status monitor supervising a Steam achievement watcher worker", long_about = None)]
struct Args {
    /// Opt in to the beta update channel
    #[arg(long, default_value_t = false)]
    beta: bool,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Steam installation root override
    #[arg(long)]
    steam_root: Option<PathBuf>,

    /// Worker command override
    #[arg(long)]
    worker_cmd: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing()?;

    let launched_at = Utc::now();

    let (view_tx, mut view_rx) = messages::view_channel();
    let (backend_tx, backend_rx) = messages::backend_channel();

    // Uncaught panics anywhere in the process are forwarded to the window
    // for display; the process keeps running.
    let panic_tx = view_tx.clone();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(%info, "uncaught panic");
        let _ = panic_tx.send(ViewEvent::Error(info.to_string()));
    }));

    let options = BootOptions {
        config_path: args.config,
        steam_root: args.steam_root,
        worker_cmd: args.worker_cmd,
        beta: args.beta,
    };

    // Boot before touching the terminal; a boot failure gets its own
    // error surface instead of a half-built window.
    let coordinator = match Coordinator::start(options, view_tx.clone(), launched_at).await {
        Ok(coordinator) => coordinator,
        Err(err) => {
            show_fatal_error(&err.to_string())?;
            return Err(err.into());
        }
    };

    let config_rx = coordinator.config_watch();
    let config = config_rx.borrow().clone();

    let supervisor = WorkerSupervisor::new(coordinator.bus(), config_rx, view_tx.clone());
    tokio::spawn(async move {
        if let Err(err) = supervisor.run().await {
            tracing::error!(%err, "worker supervisor failed");
        }
    });

    let backend = tokio::spawn(coordinator.run(backend_rx));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let mut app = App::new(&config);
    let result = events::run_app(&mut terminal, &mut app, &mut view_rx, &backend_tx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    backend.abort();

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// The TUI owns stdout, so logs go to a file under the cache dir.
fn init_tracing() -> Result<()> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("steamwatch");
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::File::create(dir.join("steamwatch.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Dedicated error display for boot failures: show the message full screen
/// and wait for a key before exiting.
fn show_fatal_error(message: &str) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.draw(|f| ui::draw_fatal(f, message))?;
    loop {
        if let Event::Key(_) = event::read()? {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
