//! DTOs shaped for record lists, the expiry dashboard and reminders.

use serde::Serialize;

use crate::domain::expiry::{ExpiryStatus, Severity};
use crate::domain::record::ComplianceRecord;
use crate::domain::types::{RecordId, RecordTitle};

/// A record paired with its evaluated expiry state.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecordRow {
    pub record: ComplianceRecord,
    pub status: ExpiryStatus,
    pub severity: Severity,
    /// Notes escaped for embedding in markup.
    pub notes_html: Option<String>,
}

impl RecordRow {
    pub fn new(record: ComplianceRecord, status: ExpiryStatus) -> Self {
        Self {
            severity: status.severity(),
            notes_html: record.notes.as_ref().map(|notes| notes.to_html()),
            record,
            status,
        }
    }
}

/// Dashboard counts. `expired + expiring_soon + valid == total`.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ExpirySummary {
    pub total: usize,
    pub expired: usize,
    pub expiring_soon: usize,
    pub valid: usize,
}

impl ExpirySummary {
    pub fn add(&mut self, status: &ExpiryStatus) {
        self.total += 1;
        if status.is_expired {
            self.expired += 1;
        } else if status.is_expiring_soon {
            self.expiring_soon += 1;
        } else {
            self.valid += 1;
        }
    }

    /// Whether anything needs attention.
    pub fn needs_attention(&self) -> bool {
        self.expired > 0 || self.expiring_soon > 0
    }
}

/// A renewal reminder due for a record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Reminder {
    pub record_id: RecordId,
    pub title: RecordTitle,
    /// The reminder window the record currently falls into.
    pub window_days: u32,
    pub days_until_expiry: i64,
}
