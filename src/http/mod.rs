//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, metrics)
//!     → handlers.rs (parameter shaping, address validation)
//!     → blockchain subsystem (the write pipeline)
//!     → error.rs (failure classification → HTTP status)
//! ```

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, HttpServer};
