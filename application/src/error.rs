//! Error taxonomy for portal operations

use crate::ports::session_transport::TransportError;
use thecamp_domain::DomainError;
use thiserror::Error;

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by the portal client and the letter iterator.
///
/// None of these are recovered internally; every failure is returned to the
/// immediate caller unchanged.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<DomainError> for ClientError {
    fn from(error: DomainError) -> Self {
        ClientError::Protocol(ProtocolError::InvalidArgument(error.to_string()))
    }
}

impl ClientError {
    pub fn is_protocol(&self) -> bool {
        matches!(self, ClientError::Protocol(_))
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, ClientError::InvalidState(_))
    }
}

/// Well-formed responses (or arguments) that violate the portal protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Portal rejected the request (code {code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("Portal rejected the request in '{field}' (result_code {code})")]
    NestedRejected { field: String, code: i64 },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Unexpected shape for '{field}': {detail}")]
    UnexpectedShape { field: String, detail: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Portal promised {total} letters but returned an empty page after {seen}")]
    EmptyPage { total: usize, seen: usize },
}
