//! Application layer for thecamp
//!
//! This crate contains the envelope codec, the session transport port,
//! the portal operations and the paginated letter iterator.
//! It depends only on the domain layer.

pub mod config;
pub mod envelope;
pub mod error;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{ClientSettings, DEFAULT_PAGE_SIZE};
pub use envelope::{Envelope, SUCCESS_CODE};
pub use error::{ClientError, ProtocolError, Result};
pub use ports::session_transport::{SessionTransport, TransportError};
pub use use_cases::letter_iterator::LetterIterator;
pub use use_cases::portal_client::{CampClient, LetterPage, endpoints};
