//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private keys)
//!     → wallet.rs (key loading, signing, per-signer nonce lane)
//!     → client.rs (RPC connection with timeouts)
//!     → submitter.rs (build, sign, broadcast, receipt wait)
//!     → contracts.rs (ABI bindings for the fixed contract functions)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contracts;
pub mod signing;
pub mod submitter;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use signing::SignedTransaction;
pub use submitter::{ContractCall, TransactionSubmitter};
pub use types::{BlockchainError, BlockchainResult, TxOutcome, TxStatus};
pub use wallet::Wallet;
