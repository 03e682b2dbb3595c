//! Errors reported by the injected transport.
//!
//! Failures come back tagged, so callers never inspect arbitrary shapes to
//! find a message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON error payload returned by the REST backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Failure reported by an injected async operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("backend responded with status {status}")]
    Backend { status: u16, body: ApiErrorBody },

    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Text(String),

    #[error("unexpected error")]
    Unknown,
}

pub type RemoteResult<T> = Result<T, RemoteError>;

impl RemoteError {
    /// Builds an error from a non-success HTTP response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(body) => RemoteError::Backend { status, body },
            Err(_) if !body.trim().is_empty() => RemoteError::Text(body.trim().to_string()),
            Err(_) => RemoteError::Backend {
                status,
                body: ApiErrorBody::default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_response_parses_json_payloads() {
        let err = RemoteError::from_response(400, r#"{"error":"Invalid licence number"}"#);
        assert_eq!(
            err,
            RemoteError::Backend {
                status: 400,
                body: ApiErrorBody {
                    error: Some("Invalid licence number".to_string()),
                    message: None,
                },
            }
        );
    }

    #[test]
    fn from_response_keeps_plain_bodies_as_text() {
        let err = RemoteError::from_response(502, "Bad Gateway");
        assert_eq!(err, RemoteError::Text("Bad Gateway".to_string()));
    }

    #[test]
    fn from_response_with_empty_body_has_no_payload() {
        let err = RemoteError::from_response(500, "");
        assert_eq!(
            err,
            RemoteError::Backend {
                status: 500,
                body: ApiErrorBody::default(),
            }
        );
    }
}
