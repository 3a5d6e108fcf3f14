//! userdir-tui binary entry point.
//!
//! Parses the command line, sets up file logging, puts the terminal in raw
//! mode, runs the TUI event loop, and restores the terminal on exit.
//!
use std::sync::{Arc, Mutex};

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use userdir_tui::app::{self, AppState, Theme, keymap::Keymap};
use userdir_tui::config::Config;
use userdir_tui::error::{Context, Result};
use userdir_tui::fetch::HttpUserSource;

/// Log to `cfg.log_file` if given; stdout belongs to the TUI.
fn init_logging(cfg: &Config) -> Result<()> {
    let Some(path) = cfg.log_file.as_ref() else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().with_ctx(|| "enable raw mode".to_string())?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .with_ctx(|| "enter alternate screen".to_string())?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).with_ctx(|| "create terminal".to_string())?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cfg = Config::parse();
    init_logging(&cfg)?;
    info!(base_url = %cfg.base_url, "starting");

    let source = HttpUserSource::new(&cfg.base_url)
        .with_ctx(|| format!("configure user source for {}", cfg.base_url))?;
    let state = AppState::new(
        Theme::load_or_init(&cfg.theme),
        Keymap::load_or_init(&cfg.keybinds),
    );

    let mut terminal = init_terminal()?;
    let res = app::run(&mut terminal, state, Arc::new(source), cfg.user);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
