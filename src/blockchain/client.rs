//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Query chain state (nonce, gas price, chain id, receipts)
//! - Broadcast raw signed transactions and run read-only calls
//! - Handle timeouts and network errors gracefully
//! - Provide an on-demand connectivity probe for `/health`

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::schema::BlockchainConfig;
use crate::observability::metrics;

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    config: BlockchainConfig,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// Fails only on an unparseable RPC URL; reachability is verified
    /// separately at startup via [`Self::is_connected`].
    pub fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider =
            Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        Ok(Self {
            provider,
            config,
            timeout_duration,
        })
    }

    /// Run one provider call under the configured timeout.
    async fn rpc<T, F>(&self, fut: F, what: &str) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, alloy::transports::TransportError>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(call = what, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{}: {}", what, e)))
            }
            Err(_) => {
                tracing::warn!(call = what, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<u64> {
        self.rpc(self.provider.get_chain_id(), "eth_chainId").await
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.rpc(self.provider.get_block_number(), "eth_blockNumber")
            .await
    }

    /// Get the transaction count (nonce) for an address, pending tag.
    ///
    /// The pending tag makes a broadcast-but-unmined transaction visible to
    /// the next submission from the same signer.
    pub async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.rpc(
            self.provider.get_transaction_count(address).pending(),
            "eth_getTransactionCount",
        )
        .await
    }

    /// Get the network-suggested gas price in wei.
    pub async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.rpc(self.provider.get_gas_price(), "eth_gasPrice").await
    }

    /// Get a transaction receipt by hash, `None` while pending.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.rpc(
            self.provider.get_transaction_receipt(tx_hash),
            "eth_getTransactionReceipt",
        )
        .await
    }

    /// Broadcast raw signed transaction bytes, returning the hash.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash> {
        let pending = self
            .rpc(
                self.provider.send_raw_transaction(raw),
                "eth_sendRawTransaction",
            )
            .await?;
        Ok(*pending.tx_hash())
    }

    /// Execute a read-only call (no state change), returning the raw output.
    pub async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.rpc(self.provider.call(tx), "eth_call").await
    }

    /// Check if the RPC endpoint is reachable. Computed on demand, not cached.
    pub async fn is_connected(&self) -> bool {
        let connected = self.get_block_number().await.is_ok();
        metrics::record_network_health(connected);
        connected
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
