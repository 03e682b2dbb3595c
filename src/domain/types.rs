//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (trimmed, non-empty identifiers,
//! titles and notes) so that once a value reaches the domain layer it can be
//! treated as trusted. Text is stored as typed; HTML escaping happens when it
//! is rendered.
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided date was neither RFC 3339 nor `YYYY-MM-DD`.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(
    RecordId,
    "Backend-assigned identifier of a compliance record."
);

non_empty_string_newtype!(
    QueryKey,
    "Name of a cached collection whose subscribers refetch on invalidation."
);

non_empty_string_newtype!(
    RecordTitle,
    "Display title of a compliance record enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(
    ReferenceNumber,
    "Licence, disc or certificate number as printed on the document."
);

/// Free-text notes attached to a record; trimmed and non-empty.
///
/// Holds the plain text exactly as the user typed it. Use
/// [`RecordNotes::to_html`] when embedding it in markup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct RecordNotes(String);

impl RecordNotes {
    /// Constructs a trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let inner = NonEmptyString::new(value)?;
        Ok(Self(inner.into_inner()))
    }

    /// The notes escaped for use as HTML text content.
    pub fn to_html(&self) -> String {
        ammonia::clean_text(&self.0)
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for RecordNotes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RecordNotes {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RecordNotes {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordNotes> for String {
    fn from(value: RecordNotes) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_is_trimmed() {
        let id = RecordId::new("  abc-123 ").unwrap();
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn blank_query_key_is_rejected() {
        assert_eq!(QueryKey::new("   "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn notes_keep_plain_text_through_serde() {
        let notes: RecordNotes = serde_json::from_str("\"Tom & Jerry <3\"").unwrap();
        assert_eq!(notes.as_str(), "Tom & Jerry <3");

        let json = serde_json::to_string(&notes).unwrap();
        assert_eq!(json, "\"Tom & Jerry <3\"");
    }

    #[test]
    fn notes_are_escaped_for_html() {
        let notes = RecordNotes::new("Renew at <script>alert('x')</script> & pay").unwrap();
        let html = notes.to_html();

        assert!(!html.contains('<'));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp;"));
    }

    #[test]
    fn blank_notes_are_rejected() {
        assert_eq!(RecordNotes::new("  \n "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn non_empty_string_deserialization_validates() {
        let parsed: Result<NonEmptyString, _> = serde_json::from_str("\"   \"");
        assert!(parsed.is_err());

        let parsed: NonEmptyString = serde_json::from_str("\" kept \"").unwrap();
        assert_eq!(parsed.as_str(), "kept");
    }

    #[test]
    fn record_id_deserialization_validates() {
        let parsed: Result<RecordId, _> = serde_json::from_str("\"  \"");
        assert!(parsed.is_err());

        let parsed: RecordId = serde_json::from_str("\"rec-1\"").unwrap();
        assert_eq!(parsed.as_str(), "rec-1");
    }
}
