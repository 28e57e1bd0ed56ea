//! Wiring: configuration in, ready-to-use [`CampClient`] out.

use crate::config::{ConfigValidationError, FileConfig};
use crate::http::HttpSessionTransport;
use std::sync::Arc;
use thecamp_application::{CampClient, TransportError};
use thiserror::Error;
use tracing::info;

/// Errors raised while building a client
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigValidationError),

    #[error("Failed to set up transport: {0}")]
    Transport(#[from] TransportError),
}

/// Build a [`CampClient`] with a fresh cookie jar.
///
/// No request is made; call [`CampClient::login`] next.
pub fn connect(config: &FileConfig) -> Result<CampClient, ConnectError> {
    config.validate()?;
    let transport = HttpSessionTransport::new(config.transport_config())?;
    let settings = config.client_settings()?;
    info!(host = %config.http.host, page_size = settings.page_size, "Portal client ready");
    Ok(CampClient::new(Arc::new(transport)).with_settings(settings))
}
