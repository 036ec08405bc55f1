//! Terminal user interface built on ratatui

mod app;
pub mod components;
mod events;
mod keys;
pub mod pages;
mod styles;

pub use app::App;
pub use events::{Event, EventHandler};

use crate::config::Config;
use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tracing::info;

pub type Backend = CrosstermBackend<io::Stdout>;
pub type Frame<'a> = ratatui::Frame<'a>;

/// Initialize the terminal for TUI mode
pub fn init_terminal(mouse_enabled: bool) -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse_enabled {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Main TUI entry point
pub async fn run(config: &Config) -> Result<()> {
    let mut app = App::new(config)?;
    let mut event_handler = EventHandler::new(Duration::from_millis(config.tick_rate_ms));
    event_handler.send(Event::StatusMessage(
        "Tab to move focus, Enter to activate, Ctrl+G for help".to_string(),
    ))?;
    let mut terminal = init_terminal(config.mouse_enabled)?;
    info!("Interactive session started");

    let result = run_app(&mut terminal, &mut app, &mut event_handler).await;

    restore_terminal(&mut terminal)?;
    info!("Interactive session ended");
    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    event_handler: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if let Some(event) = event_handler.next().await {
            if app.handle_event(event).await? {
                break; // Exit requested
            }
        }
    }
    Ok(())
}
