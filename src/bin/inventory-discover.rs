// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Discover
//!
//! Populates the state manager from a static node list.
//!
//! ```text
//! inventory-discover --base-uri https://smd:8443 static -f nodes.yaml --overwrite
//! ```
//!
//! Exits 0 when every item of every collection was written, 1 otherwise.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use inventory_discover::config::{self, ConfigFile, CONFIG_ENV_VAR};
use inventory_discover::outcome::EXIT_SUCCESS;
use inventory_discover::{
    connect_store, load_inventory, run_discovery, DataFormat, DiscoverResult, StoreConfig, WriteMode,
};

#[derive(Parser, Debug)]
#[command(name = "inventory-discover", version, about = "Populate cluster inventory from a static node list")]
struct Cli {
    /// Base URI of the state manager, without the service path
    #[arg(long, global = true)]
    base_uri: Option<String>,

    /// Cluster from the config file to target
    #[arg(long, global = true)]
    cluster: Option<String>,

    /// Config file listing clusters
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Access token (default: <CLUSTER>_ACCESS_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// PEM file with an extra CA certificate to trust
    #[arg(long, global = true)]
    cacert: Option<PathBuf>,

    /// Do not verify TLS certificates
    #[arg(long, global = true)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create inventory entries from a node list
    Static {
        /// Payload file, or - for standard input
        #[arg(short = 'f', long = "payload")]
        payload: String,

        /// Payload format (default: from extension, then content)
        #[arg(short = 'F', long = "payload-format", value_enum)]
        payload_format: Option<DataFormat>,

        /// Update items that already exist instead of failing on them
        #[arg(long)]
        overwrite: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn store_config(cli: &Cli) -> DiscoverResult<StoreConfig> {
    let file = match &cli.config {
        Some(path) => Some(ConfigFile::load(path).await?),
        None => None,
    };

    let target = config::resolve_target(file.as_ref(), cli.cluster.as_deref(), cli.base_uri.as_deref())?;
    let token = config::resolve_token(cli.token.as_deref(), target.cluster.as_deref(), |var| {
        std::env::var(var).ok()
    });

    Ok(StoreConfig {
        base_url: target.base_url,
        token,
        timeout_secs: cli.timeout,
        insecure: cli.insecure,
        ca_cert: cli.cacert.clone(),
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Commands::Static {
        payload,
        payload_format,
        overwrite,
    } = &cli.command;

    if *overwrite {
        warn!("--overwrite passed, existing inventory entries will be replaced");
    }
    let mode = WriteMode::from_overwrite(*overwrite);

    let inventory = load_inventory(payload, *payload_format)
        .await
        .with_context(|| format!("Failed to load payload {}", payload))?;

    let config = store_config(&cli)
        .await
        .context("Failed to determine state manager settings")?;
    let store = connect_store(config)
        .await
        .context("Failed to connect to state manager")?;

    let report = run_discovery(&store, &inventory, mode).await;
    let code = report.exit_code();
    if code == EXIT_SUCCESS {
        info!("Static discovery finished without errors");
    } else {
        std::process::exit(code);
    }
    Ok(())
}
