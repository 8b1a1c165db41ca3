//! Signed-transaction artifact normalization.
//!
//! Signer backends serialize a signed transaction differently: the raw
//! payload has appeared under `rawTransaction` and `raw_transaction`
//! depending on the client version. Rather than scanning the artifact
//! open-endedly, extraction walks a fixed list of known accessor keys and
//! fails closed when none matches.

use alloy::primitives::Bytes;
use serde_json::Value;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Known keys under which signer backends expose the raw signed bytes,
/// probed in order.
const RAW_PAYLOAD_KEYS: [&str; 2] = ["rawTransaction", "raw_transaction"];

/// A signed transaction as serialized by a signer backend.
///
/// Opaque to callers; the only supported operation is recovering the raw
/// broadcastable bytes. Used exactly once per submission.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    artifact: Value,
}

impl SignedTransaction {
    /// Wrap a signer backend's serialized artifact.
    pub fn from_artifact(artifact: Value) -> Self {
        Self { artifact }
    }

    /// Build an artifact from locally produced raw bytes.
    pub fn from_raw_bytes(raw: &[u8]) -> Self {
        Self {
            artifact: serde_json::json!({
                "rawTransaction": format!("0x{}", alloy::hex::encode(raw)),
            }),
        }
    }

    /// Recover the raw signed bytes for broadcast.
    ///
    /// Probes each known accessor key; fails with `SigningPayloadMissing`
    /// when the artifact exposes none of them.
    pub fn raw_payload(&self) -> BlockchainResult<Bytes> {
        for key in RAW_PAYLOAD_KEYS {
            if let Some(hex_str) = self.artifact.get(key).and_then(Value::as_str) {
                let stripped = hex_str.strip_prefix("0x").unwrap_or(hex_str);
                let bytes = alloy::hex::decode(stripped).map_err(|e| {
                    BlockchainError::Wallet(format!("Malformed raw payload under '{}': {}", key, e))
                })?;
                return Ok(Bytes::from(bytes));
            }
        }
        Err(BlockchainError::SigningPayloadMissing)
    }
}
