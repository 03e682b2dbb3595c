//! Expiry evaluation over record collections: rows, summaries and reminders.

use chrono::{DateTime, Utc};

use crate::domain::expiry::{ExpiryStatus, parse_expiry_date};
use crate::domain::record::ComplianceRecord;
use crate::domain::types::TypeConstraintError;
use crate::dto::records::{ExpirySummary, RecordRow, Reminder};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Smallest reminder window containing a non-expired status.
///
/// With windows `[90, 30, 7]`, a record with 20 days left is in the 30 day
/// window. Expired records and records beyond every window get `None`.
pub fn reminder_window(status: &ExpiryStatus, windows: &[u32]) -> Option<u32> {
    if status.is_expired {
        return None;
    }

    windows
        .iter()
        .copied()
        .filter(|window| status.days_until_expiry <= i64::from(*window))
        .min()
}

/// Evaluates records against one clock and one warning threshold.
#[derive(Debug, Clone)]
pub struct ExpiryEvaluator<C = SystemClock> {
    clock: C,
    threshold_days: u32,
}

impl ExpiryEvaluator<SystemClock> {
    pub fn system(threshold_days: u32) -> Self {
        Self::new(SystemClock, threshold_days)
    }
}

impl<C: Clock> ExpiryEvaluator<C> {
    pub fn new(clock: C, threshold_days: u32) -> Self {
        Self {
            clock,
            threshold_days,
        }
    }

    pub fn threshold_days(&self) -> u32 {
        self.threshold_days
    }

    pub fn evaluate(&self, expiry: DateTime<Utc>) -> ExpiryStatus {
        ExpiryStatus::evaluate_at(expiry, self.clock.now(), self.threshold_days)
    }

    /// Evaluates a date as typed by the user or sent by the backend.
    pub fn evaluate_str(&self, expiry: &str) -> Result<ExpiryStatus, TypeConstraintError> {
        parse_expiry_date(expiry).map(|date| self.evaluate(date))
    }

    /// Pairs each record with its status, most urgent first.
    pub fn rows<I>(&self, records: I) -> Vec<RecordRow>
    where
        I: IntoIterator<Item = ComplianceRecord>,
    {
        let now = self.clock.now();
        let mut rows: Vec<RecordRow> = records
            .into_iter()
            .map(|record| {
                let status = record.expiry_status_at(now, self.threshold_days);
                RecordRow::new(record, status)
            })
            .collect();

        rows.sort_by(|a, b| {
            a.status
                .days_until_expiry
                .cmp(&b.status.days_until_expiry)
                .then_with(|| a.record.title.cmp(&b.record.title))
        });
        rows
    }

    pub fn summarize(&self, records: &[ComplianceRecord]) -> ExpirySummary {
        let now = self.clock.now();
        records
            .iter()
            .fold(ExpirySummary::default(), |mut summary, record| {
                summary.add(&record.expiry_status_at(now, self.threshold_days));
                summary
            })
    }

    /// Reminders for every record inside one of `windows`, most urgent first.
    pub fn due_reminders(&self, records: &[ComplianceRecord], windows: &[u32]) -> Vec<Reminder> {
        let now = self.clock.now();
        let mut reminders: Vec<Reminder> = records
            .iter()
            .filter_map(|record| {
                let status = record.expiry_status_at(now, self.threshold_days);
                reminder_window(&status, windows).map(|window_days| Reminder {
                    record_id: record.id.clone(),
                    title: record.title.clone(),
                    window_days,
                    days_until_expiry: status.days_until_expiry,
                })
            })
            .collect();

        reminders.sort_by_key(|reminder| reminder.days_until_expiry);
        reminders
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::domain::expiry::Severity;
    use crate::domain::record::RecordKind;
    use crate::domain::types::{RecordId, RecordNotes, RecordTitle};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 1, 8, 0, 0).unwrap()
    }

    fn evaluator() -> ExpiryEvaluator<FixedClock> {
        ExpiryEvaluator::new(FixedClock(now()), 30)
    }

    fn record(id: &str, days: i64) -> ComplianceRecord {
        ComplianceRecord {
            id: RecordId::new(id).unwrap(),
            kind: RecordKind::Other,
            title: RecordTitle::new(format!("Record {id}")).unwrap(),
            reference_number: None,
            expiry_date: now() + Duration::days(days),
            notes: None,
            created_at: now() - Duration::days(500),
        }
    }

    fn records() -> Vec<ComplianceRecord> {
        vec![
            record("valid", 120),
            record("soon", 20),
            record("expired", -4),
            record("urgent", 5),
        ]
    }

    #[test]
    fn evaluates_against_injected_clock() {
        let status = evaluator().evaluate(now() + Duration::days(5));

        assert_eq!(
            status,
            ExpiryStatus {
                is_expired: false,
                is_expiring_soon: true,
                days_until_expiry: 5,
            }
        );
    }

    #[test]
    fn evaluate_str_accepts_calendar_dates() {
        let status = evaluator().evaluate_str("2025-07-31").unwrap();

        assert_eq!(status.days_until_expiry, -1);
        assert!(status.is_expired);
        assert!(evaluator().evaluate_str("soon").is_err());
    }

    #[test]
    fn rows_are_sorted_by_urgency_with_severity() {
        let rows = evaluator().rows(records());

        let ids: Vec<_> = rows.iter().map(|row| row.record.id.as_str()).collect();
        assert_eq!(ids, vec!["expired", "urgent", "soon", "valid"]);
        assert_eq!(rows[0].severity, Severity::StrongAlert);
        assert_eq!(rows[1].severity, Severity::Caution);
        assert_eq!(rows[3].severity, Severity::Default);
    }

    #[test]
    fn rows_carry_escaped_notes() {
        let mut noted = record("noted", 10);
        noted.notes = Some(RecordNotes::new("Bring <ID> & proof").unwrap());

        let rows = evaluator().rows(vec![noted, record("plain", 50)]);

        let html = rows[0].notes_html.as_deref().unwrap();
        assert!(html.contains("&lt;ID&gt;"));
        assert_eq!(rows[0].record.notes.as_ref().unwrap().as_str(), "Bring <ID> & proof");
        assert_eq!(rows[1].notes_html, None);
    }

    #[test]
    fn summary_counts_partition_total() {
        let summary = evaluator().summarize(&records());

        assert_eq!(
            summary,
            ExpirySummary {
                total: 4,
                expired: 1,
                expiring_soon: 2,
                valid: 1,
            }
        );
        assert!(summary.needs_attention());
        assert!(!ExpirySummary::default().needs_attention());
    }

    #[test]
    fn reminder_window_picks_smallest_containing_window() {
        let windows = [90, 30, 7];
        let status = |days| ExpiryStatus::evaluate_at(now() + Duration::days(days), now(), 30);

        assert_eq!(reminder_window(&status(7), &windows), Some(7));
        assert_eq!(reminder_window(&status(8), &windows), Some(30));
        assert_eq!(reminder_window(&status(0), &windows), Some(7));
        assert_eq!(reminder_window(&status(91), &windows), None);
        assert_eq!(reminder_window(&status(-2), &windows), None);
        assert_eq!(reminder_window(&status(3), &[]), None);
    }

    #[test]
    fn due_reminders_skip_expired_and_distant_records() {
        let reminders = evaluator().due_reminders(&records(), &[90, 30, 7]);

        let due: Vec<_> = reminders
            .iter()
            .map(|r| (r.record_id.as_str(), r.window_days))
            .collect();
        assert_eq!(due, vec![("urgent", 7), ("soon", 30)]);
    }
}
