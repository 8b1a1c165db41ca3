//! Gateway entry point: configuration, startup checks, serve.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bond_gateway::blockchain::wallet::{BOND_ISSUER_KEY_ENV, IDENTITY_MINTER_KEY_ENV};
use bond_gateway::blockchain::{BlockchainClient, Wallet};
use bond_gateway::config::loader;
use bond_gateway::http::HttpServer;
use bond_gateway::observability::metrics;

#[derive(Parser)]
#[command(name = "bond-gateway")]
#[command(about = "Transaction-signing gateway for the tokenized-bond platform")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bond_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("bond-gateway v0.1.0 starting");

    let args = Args::parse();
    let config = loader::load_or_default(&args.config)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.blockchain.rpc_url,
        receipt_timeout_secs = config.blockchain.receipt_timeout_secs,
        "Configuration loaded"
    );

    // Failure to reach the RPC endpoint at startup is fatal.
    let client = BlockchainClient::new(config.blockchain.clone())?;
    let chain_id = client.get_chain_id().await.map_err(|e| {
        format!(
            "Failed to connect to Ethereum node at {}: {}",
            config.blockchain.rpc_url, e
        )
    })?;
    tracing::info!(chain_id, "Connected to network");

    let identity_minter = Wallet::from_env(IDENTITY_MINTER_KEY_ENV, "identity-minter")?;
    let bond_issuer = Wallet::from_env(BOND_ISSUER_KEY_ENV, "bond-issuer")?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, client, identity_minter, bond_issuer)?;
    server.run(listener).await?;
    Ok(())
}
