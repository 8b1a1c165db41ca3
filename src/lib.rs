//! Transaction-signing HTTP gateway for a tokenized-bond platform.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 BOND GATEWAY                  │
//!                      │                                               │
//!   Client Request     │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!   ──────────────────▶│  │  http  │──▶│ handlers │──▶│ blockchain │──┼──▶ JSON-RPC
//!                      │  │ server │   │          │   │ submitter  │  │    endpoint
//!                      │  └────────┘   └────┬─────┘   └────────────┘  │
//!                      │                    │                          │
//!                      │                    └──────────────────────────┼──▶ bonds-listing
//!                      │                         (/api/bonds proxy)    │    service
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐  │
//!                      │  │          Cross-Cutting Concerns          │  │
//!                      │  │   config  ·  observability  ·  errors    │  │
//!                      │  └─────────────────────────────────────────┘  │
//!                      └──────────────────────────────────────────────┘
//! ```
//!
//! Two signer identities (identity minter, bond issuer) are loaded once at
//! startup from environment variables. Each mutating endpoint shapes its
//! parameters into a contract call and hands it to the transaction
//! submitter, which serializes nonce use per signer.

// Core subsystems
pub mod blockchain;
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod observability;

pub use config::GatewayConfig;
pub use http::HttpServer;
