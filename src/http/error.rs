//! API error type and HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::blockchain::types::BlockchainError;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A supplied address failed format validation. Raised before any
    /// network call is attempted.
    #[error("{0}")]
    InvalidAddress(String),

    /// A numeric parameter does not fit its ABI type. Raised before any
    /// network call is attempted.
    #[error("{0}")]
    InvalidParameter(String),

    /// The write pipeline failed (signing, broadcast, receipt wait).
    #[error("Transaction error: {0}")]
    Blockchain(#[from] BlockchainError),

    /// The bonds-listing upstream failed or was unreachable.
    #[error("Error fetching bonds data: {0}")]
    UpstreamProxy(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidAddress(_) | Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Self::Blockchain(_) | Self::UpstreamProxy(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
