//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.
//! Private keys are deliberately absent: they come from the environment only.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// RPC endpoint and transaction-wait settings.
    pub blockchain: BlockchainConfig,

    /// Externally deployed contract addresses.
    pub contracts: ContractsConfig,

    /// Upstream bond-listing service.
    pub bonds_api: BondsApiConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Blockchain RPC settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL. Required; may also come from `HOLESKY_RPC_URL`.
    pub rpc_url: String,

    /// Per-call RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Overall receipt wait window in seconds. The original service waited
    /// indefinitely; an explicit window bounds worker occupancy.
    pub receipt_timeout_secs: u64,

    /// Receipt poll interval in seconds.
    pub receipt_poll_secs: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: String::new(),
            rpc_timeout_secs: 10,
            receipt_timeout_secs: 120,
            receipt_poll_secs: 2,
        }
    }
}

/// Externally deployed contract addresses.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractsConfig {
    /// Soulbound identity token contract address.
    pub identity_token: String,

    /// Bond factory contract address.
    pub bond_factory: String,
}

/// Upstream bond-listing service settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BondsApiConfig {
    /// Full URL of the upstream bonds endpoint.
    pub url: String,

    /// Upstream request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BondsApiConfig {
    fn default() -> Self {
        Self {
            url: "http://51.250.96.12:34915/api/bonds?onchain=true".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds. Must exceed the receipt wait window
    /// or confirmed submissions get cut off at the HTTP layer.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 150 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.blockchain.rpc_timeout_secs, 10);
        assert_eq!(config.blockchain.receipt_timeout_secs, 120);
        assert!(config.timeouts.request_secs > config.blockchain.receipt_timeout_secs);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_minimal_toml_parses() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [blockchain]
            rpc_url = "https://holesky.example/rpc"

            [contracts]
            identity_token = "0x0000000000000000000000000000000000000001"
            bond_factory = "0x0000000000000000000000000000000000000002"
            "#,
        )
        .unwrap();
        assert_eq!(config.blockchain.rpc_url, "https://holesky.example/rpc");
        // Unspecified sections fall back to defaults.
        assert_eq!(config.blockchain.receipt_poll_secs, 2);
        assert_eq!(config.listener.bind_address, "127.0.0.1:8000");
    }
}
