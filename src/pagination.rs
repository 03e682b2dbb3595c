//! Cursor-based pagination.
//!
//! A cursor is the backend's resume position for a list query: a small JSON
//! object with the last seen sort key and id. It travels through query
//! strings, so it is encoded as URL-safe base64 of its JSON text.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Page size used when the caller does not override it.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Largest page a single request may ask for.
pub const MAX_ITEMS_PER_PAGE: usize = 100;

/// Opaque resume position of a paginated query.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaginationCursor(Map<String, Value>);

impl PaginationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cursor with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for PaginationCursor {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("malformed pagination cursor")]
    Malformed,
}

/// Encodes a cursor into a string safe to embed in a URL query.
pub fn encode_cursor(cursor: &PaginationCursor) -> String {
    let json = Value::Object(cursor.0.clone()).to_string();
    URL_SAFE_NO_PAD.encode(json.as_bytes())
}

/// Decodes a string produced by [`encode_cursor`].
pub fn decode_cursor(encoded: &str) -> Result<PaginationCursor, CursorError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim())
        .map_err(|_| CursorError::Malformed)?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(PaginationCursor(map)),
        _ => Err(CursorError::Malformed),
    }
}

/// Decodes an optional cursor, treating a malformed one as absent so the
/// list restarts from its first page.
pub fn decode_cursor_or_restart(encoded: Option<&str>) -> Option<PaginationCursor> {
    let encoded = encoded.map(str::trim).filter(|s| !s.is_empty())?;

    match decode_cursor(encoded) {
        Ok(cursor) => Some(cursor),
        Err(err) => {
            log::warn!("Ignoring pagination cursor {encoded:?}: {err}");
            None
        }
    }
}

/// One page of a cursor-paginated collection.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<PaginationCursor>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<PaginationCursor>) -> Self {
        Self { items, next_cursor }
    }

    /// A page with nothing after it.
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}
