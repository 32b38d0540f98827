//! pinmap - join a session's shared map from the terminal
//!
//! Opens the session named on the command line, renders the registration
//! form and roster, and runs until the user quits.

use std::io;
use std::sync::Arc;
use std::time::Duration;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use pinmap::application::{App, AppMode};
use pinmap::config::Cli;
use pinmap::infrastructure::{init_logging, HttpBackend};
use pinmap::presentation::{render_ui, InputHandler};

/// How long to wait for a key before checking on background results.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Entry point for pinmap.
///
/// Resolves configuration, builds the HTTP backend, opens the requested
/// session and runs the event loop.
///
/// # Errors
///
/// Returns an error for invalid arguments, a backend client that cannot be
/// built, or terminal failures.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    let config = cli.to_config()?;
    let backend = HttpBackend::new(config.api_base_url.clone(), config.request_timeout)?;
    info!(api_base_url = %config.api_base_url, "starting");

    let mut app = App::new(config, Arc::new(backend));
    app.open_session(&cli.session_no);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

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
/// Redraws, applies any backend results that arrived, then waits briefly
/// for a key. Continues until the user presses 'q' in normal mode.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.process_pending_events();
        terminal.draw(|f| render_ui(f, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if app.mode == AppMode::Normal => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
