//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check contract addresses parse, URLs are well-formed, timeouts sane
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;

use crate::config::schema::GatewayConfig;

/// A single semantic configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingRpcUrl,
    InvalidUrl { field: &'static str, value: String },
    InvalidAddress { field: &'static str, value: String },
    ZeroTimeout { field: &'static str },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRpcUrl => {
                write!(f, "blockchain.rpc_url is required (or set HOLESKY_RPC_URL)")
            }
            Self::InvalidUrl { field, value } => {
                write!(f, "{} is not a valid URL: '{}'", field, value)
            }
            Self::InvalidAddress { field, value } => {
                write!(f, "{} is not a valid address: '{}'", field, value)
            }
            Self::ZeroTimeout { field } => write!(f, "{} must be greater than zero", field),
        }
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.blockchain.rpc_url.is_empty() {
        errors.push(ValidationError::MissingRpcUrl);
    } else if config.blockchain.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "blockchain.rpc_url",
            value: config.blockchain.rpc_url.clone(),
        });
    }

    for (field, value) in [
        ("contracts.identity_token", &config.contracts.identity_token),
        ("contracts.bond_factory", &config.contracts.bond_factory),
    ] {
        if value.parse::<Address>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.clone(),
            });
        }
    }

    if config.bonds_api.url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "bonds_api.url",
            value: config.bonds_api.url.clone(),
        });
    }

    for (field, value) in [
        ("blockchain.rpc_timeout_secs", config.blockchain.rpc_timeout_secs),
        (
            "blockchain.receipt_timeout_secs",
            config.blockchain.receipt_timeout_secs,
        ),
        ("bonds_api.timeout_secs", config.bonds_api.timeout_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
