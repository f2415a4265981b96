//! CLI command definitions for the `relaychat` binary.
//!
//! Two commands: `serve` hosts the relay endpoint, `chat` runs the chat
//! surface in the terminal against a running relay.

pub mod chat;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Minimal streaming chat relay for Gemini.
#[derive(Parser)]
#[command(name = "relaychat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server.
    Serve {
        /// Host to bind to. Overrides the config file.
        #[arg(long, env = "RELAYCHAT_HOST")]
        host: Option<String>,

        /// Port to listen on. Overrides the config file.
        #[arg(short, long, env = "RELAYCHAT_PORT")]
        port: Option<u16>,

        /// Path to config.toml (default: <config dir>/relaychat/config.toml).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Chat with a running relay from the terminal.
    Chat {
        /// Base URL of the relay server.
        #[arg(long, env = "RELAYCHAT_URL", default_value = "http://127.0.0.1:3000")]
        url: String,
    },
}
