//! Transaction building, signing, broadcast, and confirmation.
//!
//! The write pipeline for every mutating endpoint:
//! nonce fetch → gas price / chain id fetch → build → sign → broadcast →
//! receipt poll. Nonce fetch through broadcast runs under the signer's
//! nonce lane; the receipt wait does not.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, TxOutcome, TxStatus};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// A concrete contract invocation: target plus ABI-encoded calldata.
///
/// Constructed per request by the helpers in [`crate::blockchain::contracts`];
/// never reused.
#[derive(Debug, Clone)]
pub struct ContractCall {
    /// Target contract address.
    pub to: Address,
    /// ABI-encoded function selector and arguments.
    pub input: Bytes,
    /// Function name, for logging and metrics only.
    pub function: &'static str,
}

/// Converts a [`ContractCall`] + [`Wallet`] into a confirmed [`TxOutcome`].
#[derive(Debug, Clone)]
pub struct TransactionSubmitter {
    client: BlockchainClient,
}

impl TransactionSubmitter {
    pub fn new(client: BlockchainClient) -> Self {
        Self { client }
    }

    /// Sign and submit a contract call, blocking until the receipt arrives
    /// or the configured wait window expires.
    ///
    /// The transaction is assembled fresh: nonce (pending tag), gas price,
    /// and chain id are all fetched live. A stale nonce is never replayed.
    pub async fn submit(
        &self,
        call: ContractCall,
        wallet: &Wallet,
        gas_limit: u64,
    ) -> BlockchainResult<TxOutcome> {
        let lane = wallet.lock_nonce_lane().await;

        let nonce = self.client.get_transaction_count(wallet.address()).await?;
        let gas_price = self.client.get_gas_price().await?;
        let chain_id = self.client.get_chain_id().await?;

        let tx = TransactionRequest::default()
            .with_from(wallet.address())
            .with_to(call.to)
            .with_input(call.input.clone())
            .with_nonce(nonce)
            .with_gas_price(gas_price)
            .with_gas_limit(gas_limit)
            .with_chain_id(chain_id);

        let signed = wallet.sign_transaction(tx).await?;
        let raw = signed.raw_payload()?;

        let tx_hash = self
            .client
            .send_raw_transaction(raw.as_ref())
            .await
            .map_err(|e| BlockchainError::Submission(e.to_string()))?;

        // Logged before the wait so a timed-out submission can be reconciled.
        tracing::info!(
            tx_hash = %tx_hash,
            function = call.function,
            signer = wallet.label(),
            nonce,
            gas_limit,
            "Transaction broadcast, waiting for receipt"
        );
        drop(lane);

        let receipt = self.wait_for_receipt(tx_hash).await?;
        let status = TxStatus::from_receipt_flag(receipt.status());
        let outcome = TxOutcome {
            tx_hash,
            gas_used: receipt.gas_used,
            status,
        };

        metrics::record_submission(call.function, status);
        tracing::info!(
            tx_hash = %tx_hash,
            function = call.function,
            gas_used = outcome.gas_used,
            status = status.as_str(),
            "Transaction confirmed"
        );
        Ok(outcome)
    }

    /// Run a contract call as a read-only simulation (`eth_call`).
    ///
    /// Used for best-effort recovery of `issueBond`'s return value after the
    /// real transaction has mined; see DESIGN.md for the limitation.
    pub async fn simulate(&self, call: &ContractCall, from: Address) -> BlockchainResult<Bytes> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(call.to)
            .with_input(call.input.clone());
        self.client.call(tx).await
    }

    /// Poll for the receipt until it arrives or the wait window expires.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<TransactionReceipt> {
        let config = self.client.config();
        let wait = Duration::from_secs(config.receipt_timeout_secs);
        let poll = Duration::from_secs(config.receipt_poll_secs.max(1));

        let result = timeout(wait, async {
            let mut ticker = interval(poll);
            loop {
                ticker.tick().await;
                match self.client.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return Ok(receipt),
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    }
                    Err(e) => return Err(BlockchainError::Submission(e.to_string())),
                }
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::ReceiptTimeout {
                tx_hash,
                waited_secs: config.receipt_timeout_secs,
            }),
        }
    }

    /// The underlying RPC client.
    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }
}
