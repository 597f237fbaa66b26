//! utils
//!
//! Small shared helpers: participant identities, clock access and seeding.

pub mod principal;
pub use principal::Principal;

pub mod security;
pub mod time;
