//! Play command implementation - interactive session against a server.

use super::keys::{self, Intent};
use super::{CliError, view};
use columbus::{ClientConfig, Driver, GridSize, HttpServer, SessionEvent};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stdout, stdout};
use std::path::Path;
use std::time::Duration;

/// How often the screen is redrawn and the keyboard checked.
const INPUT_TICK: Duration = Duration::from_millis(50);

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the logger or the terminal cannot be set up. Server
/// failures during play are logged, never returned.
pub(crate) async fn execute(config: ClientConfig, log_file: Option<&Path>) -> Result<(), CliError> {
    // The screen is taken over, so stderr logging is opt-in through RUST_LOG
    let default_directive = if log_file.is_some() { "info" } else { "off" };
    super::init_logging(log_file, default_directive)?;

    let server = HttpServer::new(&config)?;
    let grid = config.grid;
    let mut driver = Driver::new(server, config);

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let result = run_loop(&mut terminal, &mut driver, grid).await;

    driver.dispatch(SessionEvent::Shutdown).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    driver: &mut Driver<HttpServer>,
    grid: GridSize,
) -> Result<(), CliError> {
    loop {
        terminal
            .draw(|f| view::ui(f, driver.session(), grid))
            .map_err(|e| CliError::new(e.to_string()))?;

        tokio::select! {
            Some(background) = driver.next_event() => {
                driver.dispatch(background).await;
            }
            () = tokio::time::sleep(INPUT_TICK) => {
                if event::poll(Duration::ZERO)?
                    && let Event::Key(key) = event::read()?
                    && key.kind == KeyEventKind::Press
                {
                    match keys::intent_for(key.code, driver.session().phase()) {
                        Intent::Quit => return Ok(()),
                        Intent::Session(input) => driver.dispatch(input).await,
                        Intent::None => {}
                    }
                }
            }
        }
    }
}
