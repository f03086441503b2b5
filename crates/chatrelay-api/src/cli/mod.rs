//! CLI command definitions for the `chatrelay` binary.
//!
//! `serve` runs the backend gateway; `chat` and `send` are client relays
//! that talk to a running gateway over HTTP.

pub mod chat;
pub mod send;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Relay chat messages to upstream language-model providers.
#[derive(Parser)]
#[command(name = "chatrelay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./chatrelay.toml).
    #[arg(long, global = true, env = "CHATRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the backend gateway (POST /message).
    Serve {
        /// Port to listen on.
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to.
        #[arg(long)]
        host: Option<String>,

        /// Export spans through OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,

        /// Emit logs as JSON lines.
        #[arg(long)]
        log_json: bool,
    },

    /// Start an interactive chat session against a running gateway.
    Chat {
        /// Gateway URL (defaults to [client].gateway_url).
        #[arg(long)]
        url: Option<String>,
    },

    /// Send a single message and print the reply.
    Send {
        /// The message to send.
        message: String,

        /// Gateway URL (defaults to [client].gateway_url).
        #[arg(long)]
        url: Option<String>,

        /// Print `{"reply"}` / `{"error"}` JSON instead of formatted text.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
