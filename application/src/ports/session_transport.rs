//! Session transport port
//!
//! Defines how the application layer talks to the portal over HTTP.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while moving bytes to and from the portal
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Authenticated POST channel to the portal.
///
/// Implementations keep the session cookie between calls for as long as the
/// instance lives; callers never see the cookie. A single call performs
/// exactly one round trip and returns the raw response body.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// POST `body` as JSON to `path` (relative to the portal host).
    async fn post(&self, path: &str, body: &Value) -> Result<Vec<u8>, TransportError>;
}
