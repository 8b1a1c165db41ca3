//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, CORS, metrics)
//! - Bind server to listener and serve with graceful shutdown

use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use alloy::primitives::Address;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::blockchain::{BlockchainClient, TransactionSubmitter, Wallet};
use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub submitter: TransactionSubmitter,
    pub client: BlockchainClient,
    pub identity_minter: Wallet,
    pub bond_issuer: Wallet,
    pub identity_token: Address,
    pub bond_factory: Address,
    pub http: reqwest::Client,
    pub bonds_url: String,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and signers.
    pub fn new(
        config: GatewayConfig,
        client: BlockchainClient,
        identity_minter: Wallet,
        bond_issuer: Wallet,
    ) -> Result<Self, String> {
        let identity_token: Address = config
            .contracts
            .identity_token
            .parse()
            .map_err(|e| format!("Invalid identity token address: {}", e))?;
        let bond_factory: Address = config
            .contracts
            .bond_factory
            .parse()
            .map_err(|e| format!("Invalid bond factory address: {}", e))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.bonds_api.timeout_secs))
            .build()
            .map_err(|e| format!("Failed to build upstream HTTP client: {}", e))?;

        let state = AppState {
            submitter: TransactionSubmitter::new(client.clone()),
            client,
            identity_minter,
            bond_issuer,
            identity_token,
            bond_factory,
            http,
            bonds_url: config.bonds_api.url.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/nft/mint", get(handlers::mint_nft))
            .route("/api/bond/issue", get(handlers::issue_bond))
            .route("/api/bond/mint-tokens", get(handlers::mint_bond_tokens))
            .route("/api/bonds", get(handlers::get_bonds))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(middleware::from_fn(track_metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            // The original service allowed all origins; the frontend relies on it.
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Record per-endpoint request counts and latency.
async fn track_metrics(matched_path: Option<MatchedPath>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = matched_path
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&endpoint, response.status().as_u16(), start);
    response
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
