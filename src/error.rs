use thiserror::Error;

/// Errors surfaced by the HEdex client.
///
/// All variants propagate immediately to the caller; there is no retry
/// or recovery inside the client.
#[derive(Debug, Error)]
pub enum HedexError {
    /// The login endpoint rejected the credentials or was unreachable.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The login response could not be parsed as a SOAP login reply.
    #[error("malformed login response: {0}")]
    Protocol(String),

    /// A report request failed on the wire or returned a non-success status.
    #[error("report request failed: {0}")]
    Request(String),

    /// A report body was not valid JSON.
    #[error("report body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HedexError>;
