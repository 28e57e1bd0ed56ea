//! reqwest-backed [`SessionTransport`].
//!
//! Every request is a JSON POST carrying the headers the portal's own web
//! client sends. The session cookie set by the login endpoint is kept in
//! reqwest's cookie jar and replayed automatically on later calls.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use thecamp_application::{SessionTransport, TransportError};
use tracing::{debug, warn};

/// Portal base URL
pub const DEFAULT_HOST: &str = "https://www.thecamp.or.kr";

/// Browser-like user agent; the portal rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/59.0.3071.115 Safari/537.36";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const X_REQUESTED_WITH: &str = "x-requested-with";

/// Transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    pub host: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Cookie-keeping HTTP transport.
///
/// The cookie jar belongs to this instance: two transports are two
/// independent sessions.
pub struct HttpSessionTransport {
    client: reqwest::Client,
    host: String,
}

impl HttpSessionTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        reqwest::Url::parse(&config.host)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", config.host, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            host: config.host,
        })
    }

    /// Absolute URL for an endpoint path, with or without a leading slash.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.host.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn request_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(error.to_string())
    }
}

#[async_trait]
impl SessionTransport for HttpSessionTransport {
    async fn post(&self, path: &str, body: &Value) -> Result<Vec<u8>, TransportError> {
        let url = self.url_for(path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            // The portal reports failures inside the envelope; let the codec decide.
            warn!(
                %url,
                status = status.as_u16(),
                reason = status.canonical_reason().unwrap_or("Unknown"),
                "Non-success HTTP status"
            );
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Body(e.to_string())
            }
        })?;

        debug!(%url, status = status.as_u16(), bytes = bytes.len(), "Portal response received");
        Ok(bytes.to_vec())
    }
}
