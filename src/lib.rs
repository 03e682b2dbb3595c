//! Client core of the compliance tracker.
//!
//! The crate holds the logic the browser client shares across screens:
//! expiry evaluation for compliance records, cursor pagination, list state,
//! and the delete / dialog-form orchestrators that sit between the UI and
//! the REST backend. Transport, cache and notification surfaces are injected
//! through the traits in [`repository`].

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod errors;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod services;

/// Cache key of the compliance records collection.
pub const RECORDS_QUERY_KEY: &str = "records";

/// Days before expiry at which a record starts showing a warning.
pub const DEFAULT_EXPIRY_THRESHOLD_DAYS: u32 = 30;
