//! Wallet management and transaction signing.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized
//!
//! Each wallet carries a nonce lane: an async mutex held from nonce fetch
//! through broadcast so concurrent submissions from the same signer observe
//! strictly increasing nonces. The two gateway signers have independent
//! lanes and proceed fully in parallel.

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::blockchain::signing::SignedTransaction;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable holding the identity-minter private key.
pub const IDENTITY_MINTER_KEY_ENV: &str = "IDENTITY_MINTER_PRIVATE_KEY";

/// Environment variable holding the bond-issuer private key.
pub const BOND_ISSUER_KEY_ENV: &str = "BOND_ISSUER_PRIVATE_KEY";

/// Wallet for transaction signing with per-signer nonce serialization.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Role label for logging ("identity-minter", "bond-issuer").
    label: &'static str,
    /// Serializes nonce fetch-and-broadcast per signer.
    nonce_lane: Arc<Mutex<()>>,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `label` - Role label used in logs
    ///
    /// # Security
    /// The private key is parsed and stored securely. It is never logged.
    pub fn from_private_key(private_key_hex: &str, label: &'static str) -> BlockchainResult<Self> {
        // Strip 0x prefix if present
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(
            address = %signer.address(),
            signer = label,
            "Wallet initialized"
        );

        Ok(Self {
            signer,
            label,
            nonce_lane: Arc::new(Mutex::new(())),
        })
    }

    /// Load a wallet from an environment variable.
    pub fn from_env(var: &str, label: &'static str) -> BlockchainResult<Self> {
        let private_key = std::env::var(var).map_err(|_| {
            BlockchainError::Wallet(format!("Environment variable {} not set", var))
        })?;

        Self::from_private_key(&private_key, label)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the role label.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Acquire this signer's nonce lane.
    ///
    /// Held across nonce fetch, build, sign, and broadcast; released before
    /// the receipt wait so confirmation time does not serialize throughput.
    pub async fn lock_nonce_lane(&self) -> MutexGuard<'_, ()> {
        self.nonce_lane.lock().await
    }

    /// Sign a fully populated transaction request.
    ///
    /// The output is the signer backend's serialized artifact; callers
    /// recover the broadcastable bytes through
    /// [`SignedTransaction::raw_payload`].
    pub async fn sign_transaction(
        &self,
        tx: TransactionRequest,
    ) -> BlockchainResult<SignedTransaction> {
        let wallet = EthereumWallet::from(self.signer.clone());
        let envelope = tx
            .build(&wallet)
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;

        Ok(SignedTransaction::from_raw_bytes(&envelope.encoded_2718()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;
    use std::sync::atomic::{AtomicU64, Ordering};

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, "identity-minter").unwrap();
        // This is the corresponding address for the test key
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let wallet =
            Wallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY), "identity-minter")
                .unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Wallet::from_private_key("invalid_key", "identity-minter");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid private key"));
    }

    #[tokio::test]
    async fn test_sign_transaction_produces_raw_payload() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, "identity-minter").unwrap();
        let to: Address = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
            .parse()
            .unwrap();

        let tx = TransactionRequest::default()
            .with_from(wallet.address())
            .with_to(to)
            .with_value(U256::from(1u64))
            .with_nonce(0)
            .with_gas_price(1_000_000_000)
            .with_gas_limit(21_000)
            .with_chain_id(17000);

        let signed = wallet.sign_transaction(tx).await.unwrap();
        let raw = signed.raw_payload().unwrap();
        assert!(!raw.is_empty());
    }

    #[tokio::test]
    async fn test_nonce_lane_serializes_submissions() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, "identity-minter").unwrap();
        let chain_nonce = std::sync::Arc::new(AtomicU64::new(0));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let wallet = wallet.clone();
            let chain_nonce = chain_nonce.clone();
            handles.push(tokio::spawn(async move {
                let _lane = wallet.lock_nonce_lane().await;
                // Simulated fetch-then-broadcast while the lane is held.
                let nonce = chain_nonce.load(Ordering::SeqCst);
                tokio::task::yield_now().await;
                chain_nonce.store(nonce + 1, Ordering::SeqCst);
                nonce
            }));
        }

        let mut nonces = Vec::new();
        for handle in handles {
            nonces.push(handle.await.unwrap());
        }
        nonces.sort_unstable();
        // Strictly increasing: no nonce was handed out twice.
        assert_eq!(nonces, (0..8).collect::<Vec<u64>>());
    }
}
