//! CLI command definitions for the `nova` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod probe;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Multi-user chat relay in front of a local inference server.
#[derive(Parser)]
#[command(name = "nova", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Path to the TOML config file.
        #[arg(long, short, default_value = "nova.toml", env = "NOVA_CONFIG")]
        config: PathBuf,

        /// Override the configured bind host.
        #[arg(long)]
        host: Option<String>,

        /// Override the configured bind port.
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Check whether the inference backend is reachable.
    Probe {
        /// Path to the TOML config file.
        #[arg(long, short, default_value = "nova.toml", env = "NOVA_CONFIG")]
        config: PathBuf,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
