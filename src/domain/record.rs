use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::expiry::ExpiryStatus;
use crate::domain::types::{RecordId, RecordNotes, RecordTitle, ReferenceNumber};

/// Category of document a record tracks.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    DriversLicence,
    VehicleLicence,
    FirearmLicence,
    Certificate,
    Other,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::DriversLicence => "drivers_licence",
            RecordKind::VehicleLicence => "vehicle_licence",
            RecordKind::FirearmLicence => "firearm_licence",
            RecordKind::Certificate => "certificate",
            RecordKind::Other => "other",
        }
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drivers_licence" => Ok(RecordKind::DriversLicence),
            "vehicle_licence" => Ok(RecordKind::VehicleLicence),
            "firearm_licence" => Ok(RecordKind::FirearmLicence),
            "certificate" => Ok(RecordKind::Certificate),
            "other" => Ok(RecordKind::Other),
            _ => Err(format!("unknown record kind: {s}")),
        }
    }
}

/// A tracked compliance document as returned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ComplianceRecord {
    pub id: RecordId,
    pub kind: RecordKind,
    pub title: RecordTitle,
    pub reference_number: Option<ReferenceNumber>,
    pub expiry_date: DateTime<Utc>,
    pub notes: Option<RecordNotes>,
    pub created_at: DateTime<Utc>,
}

impl ComplianceRecord {
    /// Expiry status of this record relative to `now`.
    pub fn expiry_status_at(&self, now: DateTime<Utc>, threshold_days: u32) -> ExpiryStatus {
        ExpiryStatus::evaluate_at(self.expiry_date, now, threshold_days)
    }
}

/// Payload for creating a record.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewRecord {
    pub kind: RecordKind,
    pub title: RecordTitle,
    pub reference_number: Option<ReferenceNumber>,
    pub expiry_date: DateTime<Utc>,
    pub notes: Option<RecordNotes>,
}

/// Payload for editing an existing record.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UpdateRecord {
    pub kind: RecordKind,
    pub title: RecordTitle,
    pub reference_number: Option<ReferenceNumber>,
    pub expiry_date: DateTime<Utc>,
    pub notes: Option<RecordNotes>,
}

impl From<NewRecord> for UpdateRecord {
    fn from(record: NewRecord) -> Self {
        Self {
            kind: record.kind,
            title: record.title,
            reference_number: record.reference_number,
            expiry_date: record.expiry_date,
            notes: record.notes,
        }
    }
}
