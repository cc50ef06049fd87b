//! BLOCKFALL - falling blocks in the terminal

mod input;
mod ui;

use anyhow::Context;
use blockfall::{Catalog, GameSession, Lifecycle, PieceFactory, Settings};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use input::{Command, InputHandler};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::Instant,
};

/// Get the blockfall temp directory, creating it if needed
fn blockfall_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> anyhow::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    // Setup tracing to a log file so output never lands on the game screen
    let log_dir = blockfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blockfall=debug".parse().context("invalid log directive")?),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let (settings, settings_origin) = Settings::load();

    // A broken catalog is a programming error; refuse to start
    let catalog = Catalog::standard().context("piece catalog failed validation")?;
    let factory = match settings.gameplay.seed {
        Some(seed) => {
            tracing::info!(seed, "Using fixed piece seed");
            PieceFactory::with_seed(catalog, seed)
        }
        None => PieceFactory::new(catalog),
    };
    let mut game = GameSession::new(factory);

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout(), EnterAlternateScreen).context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app and capture result
    let result = run_app(&mut terminal, &mut game, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    // A first run leaves an editable file behind
    match settings.save_if_missing(settings_origin) {
        Ok(true) => tracing::info!("Wrote default settings"),
        Ok(false) => {}
        Err(e) => tracing::warn!("Could not save settings: {}", e),
    }

    result?;

    println!("\nThanks for playing BLOCKFALL!");
    println!("Final Score: {} | Lines: {}", game.score(), game.lines());
    tracing::info!(score = game.score(), lines = game.lines(), "Shutting down");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut GameSession<PieceFactory>,
    settings: &Settings,
) -> io::Result<()> {
    let input = InputHandler::from_settings(settings);
    let tick_interval = settings.tick_interval();
    let mut next_tick = Instant::now() + tick_interval;

    loop {
        // Render
        terminal.draw(|frame| ui::render_game(frame, game, settings, input.bindings()))?;

        // Wait for input until the next gravity tick is due
        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match input.key_down(key, game.lifecycle()) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Play(action)) => {
                        let was_running = game.is_running();
                        game.process_action(action);
                        // A new game gets a full first interval
                        if !was_running && game.is_running() {
                            next_tick = Instant::now() + tick_interval;
                        }
                    }
                    None => {}
                }
            }
        }

        // Gravity only runs while a game is in progress
        if Instant::now() >= next_tick {
            if game.lifecycle() == Lifecycle::Running {
                game.tick();
            }
            next_tick = Instant::now() + tick_interval;
        }
    }
}
