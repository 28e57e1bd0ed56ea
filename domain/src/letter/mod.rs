//! Letter subdomain — correspondence sent to a trainee.
//!
//! - [`entities::Letter`] — one letter as listed by the portal
//! - [`sort_order::SortOrder`] — listing direction used by pagination

pub mod entities;
pub mod sort_order;
