//! `nova serve`: run the HTTP API until interrupted.

use std::path::Path;

use anyhow::Result;
use console::style;

use nova_infra::config::load_config;
use nova_types::llm::BackendStatus;

use crate::http::router::build_router;
use crate::state::AppState;

pub async fn serve(config_path: &Path, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(config_path).await;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let addr = config.server.bind_address();
    let state = AppState::init(config).await?;

    let backend = state.config.inference.completions_url();
    match state.orchestrator.probe().await {
        BackendStatus::Online => tracing::info!(%backend, "Inference backend online"),
        _ => tracing::warn!(%backend, "Inference backend offline; chat will fail until it is up"),
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!();
    println!(
        "  {} Nova API listening on {}",
        style("⚡").bold(),
        style(format!("http://{addr}")).cyan()
    );
    println!("  {} {}", style("Backend:").dim(), style(&backend).dim());
    println!("  {}", style("Press Ctrl+C to stop").dim());

    axum::serve(listener, build_router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown().await;
    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
    tracing::info!("Shutdown signal received");
}
