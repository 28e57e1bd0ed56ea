//! HTTP adapter for the session transport port.

mod transport;

pub use transport::{
    DEFAULT_HOST, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpSessionTransport,
    HttpTransportConfig,
};
