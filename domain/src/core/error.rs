//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid sort order: {0} (expected ASC or DESC)")]
    InvalidSortOrder(String),
}
