//! Troop subdomain — trainee groups and the trainee inside each group.

pub mod entities;
