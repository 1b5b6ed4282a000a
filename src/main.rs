//! Petbook - Terminal Pet Registry
//!
//! A terminal-based pet registry. Pets and their owners live on two
//! searchable screens; every change is written to a JSON registry file in
//! the background as soon as it is made.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

mod domain;
mod application;
mod infrastructure;
mod presentation;

use application::App;
use infrastructure::PetStore;
use presentation::{render_ui, InputHandler};

const DEFAULT_REGISTRY_PATH: &str = "petbook.json";

/// Entry point for the petbook terminal application.
///
/// Opens (or seeds) the registry file, sets up the terminal interface,
/// and runs the main event loop until the user quits.
///
/// # Errors
///
/// Returns an error if the registry file cannot be read or if terminal
/// setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_REGISTRY_PATH.to_string());
    let store = PetStore::open(&path)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Each tick re-derives the screens from the store (picking up background
/// persistence failures) and redraws, then waits briefly for a key.
/// Continues running until the user presses 'q' while browsing.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.refresh();
        terminal.draw(|f| render_ui(f, app))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if app.is_browsing() => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
