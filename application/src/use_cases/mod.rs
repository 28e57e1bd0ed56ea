//! Use cases
//!
//! Portal operations built on the envelope codec and the session transport.

pub mod letter_iterator;
pub mod portal_client;
