//! Shared error type across pulsegate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Malformed request body or schema mismatch.
    BadRequest,
    /// The record store rejected the record shape.
    InvalidRecord,
    /// The record store could not serve the query.
    StoreUnavailable,
    /// A third-party API could not be reached or answered badly.
    Upstream,
    /// Invalid process configuration.
    Config,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::InvalidRecord => "INVALID_RECORD",
            ClientCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ClientCode::Upstream => "UPSTREAM",
            ClientCode::Config => "CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// Whether the caller is at fault (4xx) rather than the server (5xx).
    pub fn is_client_fault(self) -> bool {
        matches!(self, ClientCode::BadRequest | ClientCode::InvalidRecord)
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("upstream: {0}")]
    Upstream(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            GatewayError::BadRequest(_) => ClientCode::BadRequest,
            GatewayError::InvalidRecord(_) => ClientCode::InvalidRecord,
            GatewayError::StoreUnavailable(_) => ClientCode::StoreUnavailable,
            GatewayError::Upstream(_) => ClientCode::Upstream,
            GatewayError::Config(_) => ClientCode::Config,
            GatewayError::Internal(_) => ClientCode::Internal,
        }
    }

    /// The underlying message without the variant prefix.
    ///
    /// This is what callers see in the `message` field of an error body.
    pub fn message(&self) -> &str {
        match self {
            GatewayError::BadRequest(m)
            | GatewayError::InvalidRecord(m)
            | GatewayError::StoreUnavailable(m)
            | GatewayError::Upstream(m)
            | GatewayError::Config(m)
            | GatewayError::Internal(m) => m,
        }
    }
}
