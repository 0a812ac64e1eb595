use std::fs::OpenOptions;
use std::io;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use promptforge_service::Enhancer;
use promptforge_tui::app::App;
use promptforge_tui::clipboard::Osc52Clipboard;
use promptforge_tui::config::Config;
use ratatui::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<ExitCode> {
    let config = Config::parse();
    let enhancer = Arc::new(Enhancer::new(config.settings(), config.credential()));

    // One-shot: stderr logging, no terminal takeover
    if let Some(ref idea) = config.idea {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter("warn"))
            .with_writer(io::stderr)
            .init();
        return run_once(&enhancer, idea);
    }

    let log_path = config.log_path();
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    info!("promptforge starting (model={})", config.model);

    let app = App::new(enhancer, Box::new(Osc52Clipboard::stdout()))?;
    run_tui(app)?;
    Ok(ExitCode::SUCCESS)
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn run_once(enhancer: &Enhancer, idea: &str) -> Result<ExitCode> {
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    match rt.block_on(enhancer.enhance(idea)) {
        Ok(prompt) => {
            println!("{prompt}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("enhancement failed: {e:?}");
            eprintln!("Error: {e}");
            if e.is_fatal_until_restart() {
                eprintln!("Hint: run `promptforge --help` for the credential options.");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_tui(app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        // Poll with a timeout while a request or the copy acknowledgment is pending
        if app.needs_polling() && !event::poll(POLL_INTERVAL)? {
            app.tick();
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if should_quit(&app, key) {
                break;
            }
            app.handle_key(key);
        }
        app.tick();
    }

    info!("promptforge exiting");
    Ok(())
}

fn should_quit(app: &App, key: KeyEvent) -> bool {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    // q / Esc quit unless we're typing
    !app.is_input_mode() && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
}
