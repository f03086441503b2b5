//! `chatrelay serve`: run the backend gateway until Ctrl+C or SIGTERM.

use std::path::Path;

use console::style;

use chatrelay_infra::config::validate_relay_config;
use chatrelay_types::config::RelayConfig;

use crate::http::router::build_router;
use crate::state::AppState;

/// Resolve the listen address: CLI flag (or `PORT`), then config file.
pub fn listen_addr(config: &RelayConfig, host: Option<String>, port: Option<u16>) -> String {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    format!("{host}:{port}")
}

fn print_banner(addr: &str, public_dir: Option<&Path>, state: &AppState) {
    let providers = state.gateway.provider_names().join(" -> ");

    println!();
    println!(
        "  {} Server running on {}",
        style("🚀").bold(),
        style(format!("http://{addr}")).cyan()
    );
    match public_dir {
        Some(dir) => println!(
            "  {} Serving static files from: {}",
            style("📁").bold(),
            style(dir.display()).dim()
        ),
        None => println!("  {} {}", style("📁").bold(), style("No public directory, API only").dim()),
    }
    println!(
        "  {} AI providers: {} {}",
        style("🧠").bold(),
        style(providers).cyan(),
        style(format!("({})", state.gateway.mode())).dim()
    );
    println!("  {}", style("Press Ctrl+C to stop").dim());
    println!();
}

pub async fn run(config: RelayConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    validate_relay_config(&config)?;

    let state = AppState::init(&config).await?;
    let addr = listen_addr(&config, host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    print_banner(&addr, state.public_dir.as_deref(), &state);
    tracing::info!(%addr, "Gateway listening");

    let router = build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
