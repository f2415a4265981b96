//! relaychat entry point.
//!
//! Binary name: `relaychat`
//!
//! Parses CLI arguments, installs logging, then either starts the relay
//! server or runs the terminal chat surface against one.

mod cli;
mod http;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    match cli.command {
        Commands::Serve { host, port, config } => {
            cli::serve::run_server(host, port, config).await?;
        }
        Commands::Chat { url } => {
            cli::chat::loop_runner::run_chat_loop(&url).await?;
        }
    }

    Ok(())
}

/// Set up tracing based on verbosity. `RUST_LOG`, when set, wins.
fn init_tracing(cli: &Cli) {
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,relaychat=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}
