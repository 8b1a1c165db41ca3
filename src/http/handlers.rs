//! Endpoint handlers.
//!
//! All four operations are GET, including the mutating ones. That mirrors
//! the API this gateway replaces; clients depend on it.

use alloy::primitives::aliases::{U160, U40};
use alloy::primitives::{Address, U256};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::blockchain::contracts;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Identity tokens expire one year after minting.
pub const ONE_YEAR_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Deserialize)]
pub struct MintParams {
    pub to_address: String,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub transaction_hash: String,
    pub from_address: String,
    pub to_address: String,
    pub expiration: u64,
    pub gas_used: u64,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct IssueBondParams {
    pub name: String,
    /// Decimal string; the ABI type is uint160, wider than any JSON number.
    pub initial_price: String,
    pub maturity_price: String,
    pub maturity_at: u64,
}

#[derive(Debug, Serialize)]
pub struct BondIssuedResponse {
    pub transaction_hash: String,
    pub bond_address: String,
    pub from_address: String,
    pub gas_used: u64,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct MintTokensParams {
    pub bond_address: String,
    pub to_address: String,
    /// Decimal string; the ABI type is uint256.
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct TokenMintResponse {
    pub transaction_hash: String,
    pub from_address: String,
    pub to_address: String,
    pub bond_address: String,
    pub amount: String,
    pub gas_used: u64,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub connected_to_network: bool,
}

/// Validate an address before anything touches the network.
fn parse_address(value: &str, detail: &str) -> Result<Address, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::InvalidAddress(detail.to_string()))
}

/// Reject timestamps that do not fit uint40 instead of silently clamping.
fn to_uint40(value: u64, field: &'static str) -> Result<U40, ApiError> {
    U40::try_from(value)
        .map_err(|_| ApiError::InvalidParameter(format!("{} exceeds uint40 range", field)))
}

/// Parse a decimal (or 0x-prefixed) string into a uint160 value.
fn parse_uint160(value: &str, field: &'static str) -> Result<U160, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::InvalidParameter(format!("{} is not a valid uint160", field)))
}

/// Parse a decimal (or 0x-prefixed) string into a uint256 value.
fn parse_uint256(value: &str, field: &'static str) -> Result<U256, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::InvalidParameter(format!("{} is not a valid uint256", field)))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Expiration timestamp one year after `now_secs`.
pub fn expiration_one_year_from(now_secs: u64) -> u64 {
    now_secs + ONE_YEAR_SECS
}

/// GET /api/nft/mint — mint an identity token with a one-year expiry.
pub async fn mint_nft(
    State(state): State<AppState>,
    Query(params): Query<MintParams>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let to = parse_address(&params.to_address, "Invalid Ethereum address")?;
    let expiration = expiration_one_year_from(unix_now());

    // uint40 holds unix timestamps until the year 36812
    let call = contracts::identity_mint(state.identity_token, to, to_uint40(expiration, "expiration")?);
    let outcome = state
        .submitter
        .submit(call, &state.identity_minter, contracts::IDENTITY_MINT_GAS)
        .await?;

    Ok(Json(TransactionResponse {
        transaction_hash: outcome.tx_hash.to_string(),
        from_address: state.identity_minter.address().to_string(),
        to_address: state.identity_token.to_string(),
        expiration,
        gas_used: outcome.gas_used,
        status: outcome.status.as_str(),
    }))
}

/// GET /api/bond/issue — issue a new bond through the factory.
pub async fn issue_bond(
    State(state): State<AppState>,
    Query(params): Query<IssueBondParams>,
) -> Result<Json<BondIssuedResponse>, ApiError> {
    let call = contracts::issue_bond(
        state.bond_factory,
        params.name,
        parse_uint160(&params.initial_price, "initial_price")?,
        parse_uint160(&params.maturity_price, "maturity_price")?,
        to_uint40(params.maturity_at, "maturity_at")?,
    );
    let outcome = state
        .submitter
        .submit(call.clone(), &state.bond_issuer, contracts::ISSUE_BOND_GAS)
        .await?;

    // Best-effort address recovery: re-run the call as a simulation with
    // identical arguments now that the real transaction has mined. Does not
    // read the mined transaction's return data or logs; see DESIGN.md.
    let bond_address = match state
        .submitter
        .simulate(&call, state.bond_issuer.address())
        .await
        .and_then(|output| contracts::decode_issued_bond_address(&output))
    {
        Ok(address) => address.to_string(),
        Err(e) => {
            tracing::warn!(tx_hash = %outcome.tx_hash, error = %e, "Could not recover bond address");
            "unavailable".to_string()
        }
    };

    Ok(Json(BondIssuedResponse {
        transaction_hash: outcome.tx_hash.to_string(),
        bond_address,
        from_address: state.bond_issuer.address().to_string(),
        gas_used: outcome.gas_used,
        status: outcome.status.as_str(),
    }))
}

/// GET /api/bond/mint-tokens — mint bond ERC20 tokens to a recipient.
pub async fn mint_bond_tokens(
    State(state): State<AppState>,
    Query(params): Query<MintTokensParams>,
) -> Result<Json<TokenMintResponse>, ApiError> {
    let bond = parse_address(&params.bond_address, "Invalid bond address")?;
    let to = parse_address(&params.to_address, "Invalid recipient address")?;
    let amount = parse_uint256(&params.amount, "amount")?;

    let call = contracts::bond_token_mint(bond, to, amount);
    let outcome = state
        .submitter
        .submit(call, &state.bond_issuer, contracts::BOND_TOKEN_MINT_GAS)
        .await?;

    Ok(Json(TokenMintResponse {
        transaction_hash: outcome.tx_hash.to_string(),
        from_address: state.bond_issuer.address().to_string(),
        to_address: to.to_string(),
        bond_address: bond.to_string(),
        amount: amount.to_string(),
        gas_used: outcome.gas_used,
        status: outcome.status.as_str(),
    }))
}

/// GET /api/bonds — raw JSON passthrough of the upstream listing service.
pub async fn get_bonds(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let response = state
        .http
        .get(&state.bonds_url)
        .send()
        .await
        .map_err(|e| ApiError::UpstreamProxy(e.to_string()))?
        .error_for_status()
        .map_err(|e| ApiError::UpstreamProxy(e.to_string()))?;

    let body = response
        .json()
        .await
        .map_err(|e| ApiError::UpstreamProxy(e.to_string()))?;
    Ok(Json(body))
}

/// GET /health — liveness, with an on-demand connectivity probe.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = state.client.is_connected().await;
    Json(HealthResponse {
        status: "healthy",
        connected_to_network: connected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiration_is_one_year_out() {
        assert_eq!(expiration_one_year_from(1_700_000_000), 1_700_000_000 + 31_536_000);
        assert_eq!(ONE_YEAR_SECS, 31_536_000);
    }

    #[test]
    fn test_parse_address_accepts_checksummed() {
        let addr = parse_address(
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "Invalid Ethereum address",
        )
        .unwrap();
        assert_eq!(
            addr.to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        let err = parse_address("0xAbC...123", "Invalid bond address").unwrap_err();
        assert!(matches!(err, ApiError::InvalidAddress(_)));
        assert_eq!(err.to_string(), "Invalid bond address");
    }

    #[test]
    fn test_to_uint40_rejects_out_of_range() {
        assert_eq!(to_uint40((1 << 40) - 1, "maturity_at").unwrap(), U40::MAX);
        let err = to_uint40(1 << 40, "maturity_at").unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
        assert_eq!(err.to_string(), "maturity_at exceeds uint40 range");
    }

    #[test]
    fn test_parse_uint160_rejects_overflow_and_garbage() {
        assert_eq!(parse_uint160("950", "initial_price").unwrap(), U160::from(950u64));

        // 2^160 overflows by exactly one.
        let err = parse_uint160(
            "1461501637330902918203684832716283019655932542976",
            "initial_price",
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));

        let err = parse_uint160("not-a-number", "maturity_price").unwrap_err();
        assert_eq!(err.to_string(), "maturity_price is not a valid uint160");
    }

    #[test]
    fn test_parse_uint256_accepts_full_token_amounts() {
        // 10_000 tokens at 18 decimals, wider than u64.
        let amount = parse_uint256("10000000000000000000000", "amount").unwrap();
        assert_eq!(amount, U256::from(10_000u64) * U256::from(10u64).pow(U256::from(18u64)));
        assert!(parse_uint256("", "amount").is_err());
    }
}
