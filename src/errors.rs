//! Remote error taxonomy and normalization into user-facing messages.
//!
//! The transport layer reports failures as a tagged [`RemoteError`] instead of
//! an arbitrary value, so normalization is a plain `match` rather than shape
//! inspection. Every orchestrator funnels its failures through [`normalize`].

use serde::Serialize;
use thiserror::Error;

use crate::pagination::CursorError;
use crate::repository::errors::RemoteError;

/// Coarse classification attached to every normalized error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Backend,
    Network,
    Cursor,
    Unknown,
}

/// A single human-readable message plus its category.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct NormalizedError {
    pub message: String,
    pub category: ErrorCategory,
}

impl NormalizedError {
    pub fn new(message: impl Into<String>, category: ErrorCategory) -> Self {
        Self {
            message: message.into(),
            category,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(message, ErrorCategory::Validation)
    }
}

impl From<CursorError> for NormalizedError {
    fn from(err: CursorError) -> Self {
        Self::new(err.to_string(), ErrorCategory::Cursor)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Reduces a remote error to one message.
///
/// Checked in order: the backend payload's `error`, then its `message`, then
/// a generic transport message, then plain text, then `default_message`.
pub fn normalize(err: &RemoteError, default_message: &str) -> NormalizedError {
    match err {
        RemoteError::Backend { body, .. } => {
            let message = non_blank(body.error.as_deref())
                .or_else(|| non_blank(body.message.as_deref()))
                .unwrap_or(default_message);
            NormalizedError::new(message, ErrorCategory::Backend)
        }
        RemoteError::Network(message) => NormalizedError::new(
            non_blank(Some(message)).unwrap_or(default_message),
            ErrorCategory::Network,
        ),
        RemoteError::Text(text) => NormalizedError::new(
            non_blank(Some(text)).unwrap_or(default_message),
            ErrorCategory::Unknown,
        ),
        RemoteError::Unknown => NormalizedError::new(default_message, ErrorCategory::Unknown),
    }
}
