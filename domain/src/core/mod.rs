//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] — domain-level errors
//! - [`serde_helpers`] — lenient decoders for loosely typed portal fields

pub mod error;
pub mod serde_helpers;
