//! Add/edit record dialog form.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::expiry::parse_expiry_date;
use crate::domain::record::{ComplianceRecord, NewRecord, RecordKind, UpdateRecord};
use crate::domain::types::{RecordNotes, RecordTitle, ReferenceNumber, TypeConstraintError};
use crate::forms::FormError;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Validate)]
/// Raw input of the add/edit record dialog.
pub struct RecordForm {
    /// Selected from a dropdown, so it arrives typed.
    pub kind: Option<RecordKind>,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 64, message = "Reference number is too long"))]
    pub reference_number: String,
    /// `YYYY-MM-DD` from a date input, or a full RFC 3339 timestamp.
    #[validate(length(min = 1, message = "Expiry date is required"))]
    pub expiry_date: String,
    #[serde(default)]
    pub notes: String,
}

impl From<&ComplianceRecord> for RecordForm {
    /// Prefills the edit dialog from an existing record.
    fn from(record: &ComplianceRecord) -> Self {
        Self {
            kind: Some(record.kind),
            title: record.title.to_string(),
            reference_number: record
                .reference_number
                .as_ref()
                .map(|r| r.to_string())
                .unwrap_or_default(),
            expiry_date: record.expiry_date.format("%Y-%m-%d").to_string(),
            notes: record
                .notes
                .as_ref()
                .map(|n| n.to_string())
                .unwrap_or_default(),
        }
    }
}

fn optional<T, F>(value: &str, build: F, error: FormError) -> Result<Option<T>, FormError>
where
    F: FnOnce(&str) -> Result<T, TypeConstraintError>,
{
    if value.trim().is_empty() {
        return Ok(None);
    }
    build(value).map(Some).map_err(|_| error)
}

impl TryFrom<RecordForm> for NewRecord {
    type Error = FormError;

    fn try_from(form: RecordForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            kind: form.kind.ok_or(FormError::MissingKind)?,
            title: RecordTitle::new(form.title).map_err(|_| FormError::InvalidTitle)?,
            reference_number: optional(
                &form.reference_number,
                |value| ReferenceNumber::new(value),
                FormError::InvalidReferenceNumber,
            )?,
            expiry_date: parse_expiry_date(&form.expiry_date)
                .map_err(|_| FormError::InvalidExpiryDate)?,
            notes: optional(&form.notes, |value| RecordNotes::new(value), FormError::InvalidNotes)?,
        })
    }
}

impl TryFrom<RecordForm> for UpdateRecord {
    type Error = FormError;

    fn try_from(form: RecordForm) -> Result<Self, Self::Error> {
        NewRecord::try_from(form).map(UpdateRecord::from)
    }
}
