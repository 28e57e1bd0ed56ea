//! Infrastructure layer for thecamp
//!
//! This crate contains the adapters that implement the ports defined
//! in the application layer, plus configuration loading and logging setup.

pub mod config;
pub mod connect;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileHttpConfig, FileLettersConfig,
};
pub use connect::{ConnectError, connect};
pub use http::{HttpSessionTransport, HttpTransportConfig};
pub use logging::{LoggingError, init_logging};
