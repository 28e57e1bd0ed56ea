//! Domain layer for thecamp
//!
//! This crate contains the value objects returned by the portal.
//! It has no dependencies on transport or configuration concerns.
//!
//! # Core Concepts
//!
//! - **Group**: a trainee cohort the signed-in account belongs to
//! - **Trainee**: the person being written to inside a group
//! - **Letter**: one message in the correspondence history of a group
//! - **SortOrder**: the only two listing directions the portal supports

pub mod core;
pub mod letter;
pub mod troop;

// Re-export commonly used types
pub use core::error::DomainError;
pub use letter::{entities::Letter, sort_order::SortOrder};
pub use troop::entities::{Group, TraineeInfo, TraineeProfile};
