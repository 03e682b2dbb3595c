//! Domain types shared by the client services.

pub mod expiry;
pub mod record;
pub mod types;
