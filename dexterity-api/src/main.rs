//! Dexterity read API server.
//!
//! # Usage
//!
//! ```bash
//! # Serve with defaults (or ./config.toml if present)
//! dexterity-api serve
//!
//! # Point at another node and deployment
//! dexterity-api serve --rpc http://anvil:8545 \
//!     --manifest contracts/broadcast/DepositsAndSwaps.s.sol/31337/run-latest.json
//!
//! # Check what the server would bind to, without touching the node
//! dexterity-api inspect
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dexterity::abi::{EventKind, Schemas};
use dexterity_api::config::Config;
use dexterity_api::routes;
use dexterity_api::state::{AppState, Deployment};

/// Read-only HTTP API over Dexterity contract events.
#[derive(Debug, Parser)]
#[command(name = "dexterity-api", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Bind the contract and serve the HTTP API.
    Serve {
        /// Address to listen on.
        #[arg(long)]
        listen: Option<SocketAddr>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Resolve the contract binding and print it, without contacting the node.
    Inspect {
        #[command(flatten)]
        overrides: Overrides,
    },
}

/// Flags that override values from the config file.
#[derive(Debug, Args)]
struct Overrides {
    /// JSON-RPC endpoint of the node.
    #[arg(long)]
    rpc: Option<String>,

    /// Deployment manifest (`run-latest.json`).
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Compiled contract artifact.
    #[arg(long)]
    artifact: Option<PathBuf>,

    /// Manifest name of the contract to bind.
    #[arg(long)]
    contract: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if let Some(rpc) = self.rpc {
            config.rpc_url = rpc;
        }
        if let Some(manifest) = self.manifest {
            config.manifest = manifest;
        }
        if let Some(artifact) = self.artifact {
            config.artifact = artifact;
        }
        if let Some(contract) = self.contract {
            config.contract = contract;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;

    match cli.command {
        Command::Serve { listen, overrides } => {
            overrides.apply(&mut config);
            if let Some(listen) = listen {
                config.listen = listen;
            }
            cmd_serve(&config).await
        }
        Command::Inspect { overrides } => {
            overrides.apply(&mut config);
            cmd_inspect(&config)
        }
    }
}

/// Execute the `serve` subcommand.
async fn cmd_serve(config: &Config) -> Result<()> {
    let state = AppState::bind(config)?;

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("binding {}", config.listen))?;
    tracing::info!(listen = %config.listen, "listening");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

/// Resolve once Ctrl-C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

/// Execute the `inspect` subcommand.
#[allow(clippy::print_stdout)]
fn cmd_inspect(config: &Config) -> Result<()> {
    let deployment = Deployment::load(config)?;
    let schemas = Schemas::resolve(&deployment.abi)
        .with_context(|| format!("resolving events in {}", config.artifact.display()))?;

    println!("{:<10} {}", "Contract", config.contract);
    println!("{:<10} {:#x}", "Address", deployment.address);
    println!("{:<10} {}", "RPC", config.rpc_url);
    println!("{}", "-".repeat(90));
    println!("{:<12} {:<68} Topic 0", "Event", "Signature");

    for &kind in EventKind::ALL {
        let schema = schemas.get(kind);
        println!(
            "{:<12} {:<68} {:#x}",
            kind.name(),
            schema.signature(),
            schema.selector()
        );
    }
    Ok(())
}
