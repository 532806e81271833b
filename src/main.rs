use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use dsviz::app::App;
use dsviz::config::{self, CliArgs, Config};
use dsviz::error::VizError;
use dsviz::event::EventHandler;
use dsviz::headless;
use dsviz::ui;
use dsviz::workbench::Workbench;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();

    if cli.print_default_config {
        print!("{}", config::default_config_toml());
        return Ok(());
    }

    install_panic_hook()?;

    let config = config::load(&cli)?;

    // Held until exit so buffered log lines get flushed
    let _log_guard = init_logging(&config, cli.log.as_deref())?;

    info!(structure = %config.general.start_structure, speed = config.speed(), "dsviz starting");

    match cli.script.as_deref() {
        Some(script) => run_script(&config, script),
        None => run_tui(&config).await,
    }
}

/// Replay a script without a terminal and print the final value as JSON
fn run_script(config: &Config, script: &str) -> Result<()> {
    let mut bench = Workbench::seeded();
    bench.set_speed(config.speed());
    let report = headless::run_script(&mut bench, config.general.start_structure, script)
        .wrap_err("Script failed")?;
    println!("{}", report.to_json()?);
    Ok(())
}

async fn run_tui(config: &Config) -> Result<()> {
    enable_raw_mode()
        .map_err(|e| VizError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut events = EventHandler::new(config.tick_rate_ms());
    let mut app = App::new(config);

    let result = event_loop(&mut terminal, &mut app, &mut events).await;
    events.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("dsviz exiting");
    result
}

async fn event_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;
        match events.next().await {
            Some(event) => app.handle_event(event),
            None => break,
        }
    }
    Ok(())
}

/// Install color-eyre, then wrap its panic hook so the terminal is restored first
fn install_panic_hook() -> Result<()> {
    color_eyre::install()?;
    let eyre_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        eyre_hook(panic_info);
    }));
    Ok(())
}

/// Initialize tracing to a log file; the terminal belongs to the UI
fn init_logging(config: &Config, log_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::EnvFilter;

    let target: Option<PathBuf> = match log_path {
        Some(path) => Some(path.to_path_buf()),
        None if config.general.log_to_file => Some(Config::log_dir().join("dsviz.log")),
        None => None,
    };

    let Some(path) = target else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("off"))
            .with_writer(io::sink)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("Log path {} has no file name", path.display()))?;
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Failed to create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.general.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}
