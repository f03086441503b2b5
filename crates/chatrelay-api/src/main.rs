//! chatrelay entry point.
//!
//! Binary name: `chatrelay`
//!
//! Parses CLI arguments, loads `.env` and the config file, sets up tracing,
//! then either serves the gateway or runs one of the client relays.

mod cli;
mod http;
mod state;

use std::process::ExitCode;

use clap::Parser;
use clap_complete::generate;

use chatrelay_core::relay::retry::RetryPolicy;
use chatrelay_infra::config::{load_relay_config, resolve_config_path};
use chatrelay_infra::secret::load_dotenv;
use chatrelay_observe::tracing_setup::{
    TracingOptions, filter_for_verbosity, init_tracing, shutdown_tracing,
};
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Shell completions don't need config or tracing
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatrelay", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let (enable_otel, json) = match &cli.command {
        Commands::Serve { otel, log_json, .. } => (*otel, *log_json),
        _ => (false, false),
    };
    // Client commands share the terminal with the chat log, so only errors
    // are shown unless -v is given.
    let default_filter = match (&cli.command, cli.verbose, cli.quiet) {
        (Commands::Serve { .. }, _, _) => filter_for_verbosity(cli.verbose, cli.quiet),
        (_, 0, false) => "error",
        _ => filter_for_verbosity(cli.verbose, cli.quiet),
    };
    init_tracing(&TracingOptions {
        enable_otel,
        json,
        default_filter: default_filter.to_string(),
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    load_dotenv();

    let config_path = resolve_config_path(cli.config.as_deref());
    let config = load_relay_config(&config_path).await;

    let result = match cli.command {
        Commands::Serve { host, port, .. } => cli::serve::run(config, host, port)
            .await
            .map(|()| ExitCode::SUCCESS),

        Commands::Chat { url } => {
            let url = url.unwrap_or_else(|| config.client.gateway_url.clone());
            cli::chat::loop_runner::run_chat_loop(&url, RetryPolicy::from(&config.client))
                .await
                .map(|()| ExitCode::SUCCESS)
        }

        Commands::Send { message, url, json } => {
            let url = url.unwrap_or_else(|| config.client.gateway_url.clone());
            cli::send::run(&url, &message, RetryPolicy::from(&config.client), json).await
        }

        Commands::Completions { .. } => Ok(ExitCode::SUCCESS),
    };

    shutdown_tracing();
    result
}
