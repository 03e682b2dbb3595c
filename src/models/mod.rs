//! Models loaded from outside the client core.

pub mod config;
