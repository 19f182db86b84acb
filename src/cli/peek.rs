//! Peek command implementation - print one snapshot and exit.

use super::{CliError, PeekFormat};
use columbus::game::{classify, render_ascii};
use columbus::{ClientConfig, GameServer, HttpServer, Verdict};

/// Execute the peek command.
///
/// # Errors
///
/// Returns an error if either fetch fails.
pub(crate) async fn execute(config: ClientConfig, format: PeekFormat) -> Result<(), CliError> {
    super::init_logging(None, "warn")?;

    let server = HttpServer::new(&config)?;
    let (state, strategy) = tokio::try_join!(server.state(), server.current_strategy())?;

    match format {
        PeekFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        PeekFormat::Text => {
            print!("{}", render_ascii(&state, config.grid));
            println!("Pirate strategy: {strategy}");
            match classify(&state) {
                Verdict::Clear => println!("Verdict: clear sailing"),
                Verdict::Transient(kind) => println!("Verdict: notice ({})", kind.message()),
                Verdict::Blocking(kind) => println!("Verdict: halted ({})", kind.message()),
            }
        }
    }

    Ok(())
}
