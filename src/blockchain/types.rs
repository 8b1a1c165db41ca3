//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use thiserror::Error;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The signed-transaction artifact exposed no known raw-payload accessor.
    #[error("signed transaction artifact carries no raw payload under any known key")]
    SigningPayloadMissing,

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Broadcast or receipt retrieval failed (insufficient funds, revert,
    /// nonce-too-low, ...). Carries the underlying network message.
    #[error("Transaction error: {0}")]
    Submission(String),

    /// No receipt appeared within the configured wait window. The transaction
    /// may still be mined; its hash was logged at broadcast time.
    #[error("no receipt for {tx_hash} after {waited_secs} seconds")]
    ReceiptTimeout { tx_hash: TxHash, waited_secs: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Terminal outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: TxHash,
    pub gas_used: u64,
    pub status: TxStatus,
}

/// Binary status derived from the receipt's success flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    Failed,
}

impl TxStatus {
    /// Map a receipt's success flag (status == 1) to the API label.
    pub fn from_receipt_flag(succeeded: bool) -> Self {
        if succeeded {
            Self::Success
        } else {
            Self::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}
