//! Form definitions backing the record and account dialogs.

use thiserror::Error;
use validator::ValidationErrors;

pub mod account;
pub mod record;

#[derive(Debug, Error, PartialEq)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("record type is required")]
    MissingKind,

    #[error("invalid title")]
    InvalidTitle,

    #[error("invalid reference number")]
    InvalidReferenceNumber,

    #[error("invalid expiry date")]
    InvalidExpiryDate,

    #[error("invalid notes")]
    InvalidNotes,

    #[error("unknown form field: {0}")]
    UnknownField(String),

    #[error("invalid value for {field}: {message}")]
    InvalidFieldValue { field: String, message: String },

    #[error("form data must serialize to an object")]
    NotAnObject,
}

/// Picks one human-readable message out of a set of validation errors.
///
/// Fields are visited in name order so the same input always produces the
/// same message.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .find_map(|(field, errors)| {
            errors.first().map(|error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .unwrap_or_else(|| "Form is invalid".to_string())
}
