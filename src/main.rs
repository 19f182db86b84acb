//! Columbus CLI - play the treasure hunt against a running game server.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Args as ClapArgs, Parser, Subcommand};
use columbus::config::DEFAULT_BASE_URL;
use columbus::{ClientConfig, GridSize};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Columbus - sail to the treasure, dodge the pirates
#[derive(Parser, Debug)]
#[command(name = "columbus")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a game and play it in the terminal
    Play {
        #[command(flatten)]
        server: ServerArgs,

        /// Milliseconds between state polls
        #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
        poll_ms: u64,

        /// Write logs to this file (the terminal is in use while playing)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Print the server's current snapshot and exit
    Peek {
        #[command(flatten)]
        server: ServerArgs,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::PeekFormat,
    },
}

/// Where the server is and how to talk to it
#[derive(ClapArgs, Debug)]
struct ServerArgs {
    /// Base URL of the game API
    #[arg(long, env = "COLUMBUS_SERVER", default_value = DEFAULT_BASE_URL)]
    server: String,

    /// Side length of the square grid
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u16).range(1..))]
    grid_size: u16,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,
}

impl ServerArgs {
    fn into_config(self) -> ClientConfig {
        ClientConfig {
            base_url: self.server,
            grid: GridSize::new(self.grid_size).unwrap_or_default(),
            request_timeout: Duration::from_millis(self.timeout_ms),
            ..ClientConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            server,
            poll_ms,
            log_file,
        } => {
            let config = ClientConfig {
                poll_interval: Duration::from_millis(poll_ms),
                ..server.into_config()
            };
            cli::play::execute(config, log_file.as_deref()).await
        }

        Commands::Peek { server, format } => cli::peek::execute(server.into_config(), format).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
