//! ABI bindings and call constructors for the fixed gateway contracts.
//!
//! The contracts are externally deployed; only the three functions the
//! gateway invokes are bound here.

use alloy::primitives::aliases::{U160, U40};
use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::submitter::ContractCall;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

sol! {
    /// Soulbound identity token with per-holder expiry.
    interface IdentityToken {
        function mint(address to, uint40 expiration);
    }

    /// Factory deploying one ERC20 per issued bond.
    interface BondFactory {
        function issueBond(string name, uint160 initialPrice, uint160 maturityPrice, uint40 maturityAt) returns (address);
    }

    /// Per-bond ERC20 token.
    interface BondToken {
        function mint(address to, uint256 amount);
    }
}

/// Gas limit for identity token mints.
pub const IDENTITY_MINT_GAS: u64 = 200_000;

/// Gas limit for bond issuance (contract deployment via factory).
pub const ISSUE_BOND_GAS: u64 = 300_000;

/// Gas limit for bond token mints.
pub const BOND_TOKEN_MINT_GAS: u64 = 200_000;

/// Build a `mint(to, expiration)` call against the identity token contract.
pub fn identity_mint(contract: Address, to: Address, expiration: U40) -> ContractCall {
    ContractCall {
        to: contract,
        input: IdentityToken::mintCall { to, expiration }.abi_encode().into(),
        function: "mint",
    }
}

/// Build an `issueBond(...)` call against the bond factory.
pub fn issue_bond(
    factory: Address,
    name: String,
    initial_price: U160,
    maturity_price: U160,
    maturity_at: U40,
) -> ContractCall {
    ContractCall {
        to: factory,
        input: BondFactory::issueBondCall {
            name,
            initialPrice: initial_price,
            maturityPrice: maturity_price,
            maturityAt: maturity_at,
        }
        .abi_encode()
        .into(),
        function: "issueBond",
    }
}

/// Decode the bond address returned by `issueBond`.
pub fn decode_issued_bond_address(output: &[u8]) -> BlockchainResult<Address> {
    BondFactory::issueBondCall::abi_decode_returns(output)
        .map_err(|e| BlockchainError::Rpc(format!("issueBond return decode failed: {}", e)))
}

/// Build a `mint(to, amount)` call against a bond token contract.
pub fn bond_token_mint(bond: Address, to: Address, amount: U256) -> ContractCall {
    ContractCall {
        to: bond,
        input: BondToken::mintCall { to, amount }.abi_encode().into(),
        function: "mint",
    }
}
