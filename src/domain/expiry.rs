//! Expiry status of a dated compliance document.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Derived expiry state of a single date; never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryStatus {
    pub is_expired: bool,
    pub is_expiring_soon: bool,
    /// Whole days left, rounded up. Negative once the date is a full day past.
    pub days_until_expiry: i64,
}

/// Presentation policy shared by every consumer of [`ExpiryStatus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    StrongAlert,
    Caution,
    Default,
}

impl ExpiryStatus {
    /// Evaluates `expiry` relative to an explicit `now`.
    ///
    /// `days_until_expiry` is the ceiling of the remaining time in days, so a
    /// date a few hours away counts as 0 days left rather than negative. A
    /// record with exactly `threshold_days` left is flagged as expiring soon.
    pub fn evaluate_at(expiry: DateTime<Utc>, now: DateTime<Utc>, threshold_days: u32) -> Self {
        let days_until_expiry = days_until(expiry, now);
        let is_expired = days_until_expiry < 0;

        Self {
            is_expired,
            is_expiring_soon: !is_expired && days_until_expiry <= i64::from(threshold_days),
            days_until_expiry,
        }
    }

    /// Evaluates `expiry` against the current system time.
    pub fn evaluate(expiry: DateTime<Utc>, threshold_days: u32) -> Self {
        Self::evaluate_at(expiry, Utc::now(), threshold_days)
    }

    pub fn severity(&self) -> Severity {
        if self.is_expired {
            Severity::StrongAlert
        } else if self.is_expiring_soon {
            Severity::Caution
        } else {
            Severity::Default
        }
    }
}

/// List filter over the derived expiry state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Expired,
    ExpiringSoon,
    Valid,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Expired => "expired",
            StatusFilter::ExpiringSoon => "expiring_soon",
            StatusFilter::Valid => "valid",
        }
    }

    pub fn matches(&self, status: &ExpiryStatus) -> bool {
        match self {
            StatusFilter::Expired => status.is_expired,
            StatusFilter::ExpiringSoon => status.is_expiring_soon,
            StatusFilter::Valid => !status.is_expired && !status.is_expiring_soon,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expired" => Ok(StatusFilter::Expired),
            "expiring_soon" | "expiring-soon" => Ok(StatusFilter::ExpiringSoon),
            "valid" => Ok(StatusFilter::Valid),
            _ => Err(format!("unknown status filter: {s}")),
        }
    }
}

fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (expiry - now).num_milliseconds();
    let whole_days = millis / MILLIS_PER_DAY;
    // Integer division truncates toward zero, which is already the ceiling
    // for negative values.
    if millis % MILLIS_PER_DAY > 0 {
        whole_days + 1
    } else {
        whole_days
    }
}

/// Parses an RFC 3339 date-time or a `YYYY-MM-DD` calendar date (midnight UTC).
pub fn parse_expiry_date(value: &str) -> Result<DateTime<Utc>, TypeConstraintError> {
    let trimmed = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TypeConstraintError::InvalidDate(trimmed.to_string()))
}
