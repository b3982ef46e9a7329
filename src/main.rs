//! Questline - Entry Point
//!
//! Initializes logging and the terminal, loads config and the learner
//! profile, and runs the dashboard loop.

use std::io;
use std::path::Path;
use std::time::Duration;
use std::fs::OpenOptions;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    Terminal,
};

use questline::data::{QuestlineConfig, CONFIG_PATH};
use questline::save::load_profile;
use questline::ui::App;

/// How long to wait for input before redrawing
const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    // Initialize logging to file (to avoid interfering with TUI)
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("questline.log")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .target(env_logger::Target::Pipe(Box::new(log_file)))
    .init();

    log::info!("Starting Questline v{}", env!("CARGO_PKG_VERSION"));

    let config = QuestlineConfig::load_or_default(Path::new(CONFIG_PATH));
    let engine = config.engine();
    let profile = load_profile(&engine);
    let mut app = App::new(engine, config.rewards, profile);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if app.is_dirty() {
        if let Err(e) = app.save() {
            log::warn!("Failed to save profile: {}", e);
            eprintln!("Failed to save profile: {}", e);
        }
    }

    // Report any errors
    if let Err(ref e) = result {
        log::error!("Questline exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("Questline shut down cleanly");
    result
}

/// Main dashboard loop
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, not releases
                if key.kind == KeyEventKind::Press {
                    match app.handle_input(key) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => log::warn!("Input handling error: {}", e),
                    }
                }
            }
        }
    }

    Ok(())
}
