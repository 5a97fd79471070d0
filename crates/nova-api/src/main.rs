//! Nova chat relay entry point.
//!
//! Binary name: `nova`
//!
//! Parses CLI arguments, sets up tracing, then dispatches to the server or
//! one of the utility commands.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use nova_observe::tracing_setup::{filter_for_verbosity, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions need neither tracing nor config.
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "nova", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), cli.json_logs)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    match cli.command {
        Commands::Serve { config, host, port } => cli::serve::serve(&config, host, port).await?,
        Commands::Probe { config } => cli::probe::probe(&config).await?,
        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
