//! `nova probe`: one-shot backend reachability check.

use std::path::Path;

use anyhow::Result;
use console::style;

use nova_core::llm::gateway::InferenceGateway;
use nova_infra::config::load_config;
use nova_infra::llm::openai_compat::OpenAiCompatGateway;
use nova_types::llm::BackendStatus;

/// Probe the configured backend. Exits non-zero when it is offline.
pub async fn probe(config_path: &Path) -> Result<()> {
    let config = load_config(config_path).await;
    let gateway = OpenAiCompatGateway::new(&config.inference)?;

    let status = gateway.probe().await;
    let label = match status {
        BackendStatus::Online => style("online").green().bold(),
        _ => style("offline").red().bold(),
    };
    println!("  {} {}", style(gateway.url()).dim(), label);

    if status != BackendStatus::Online {
        anyhow::bail!("inference backend is offline");
    }
    Ok(())
}
