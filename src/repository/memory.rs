//! In-process implementations of the repository seams.
//!
//! Used by the report binary and by tests; the browser build wires the same
//! traits to its HTTP client and toast component.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::record::ComplianceRecord;
use crate::domain::types::{QueryKey, RecordId};
use crate::pagination::{Page, PaginationCursor};
use crate::repository::errors::RemoteResult;
use crate::repository::{CollectionReader, ListQuery, Notifier, QueryCache, SortDirection, SortField};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Query cache tracking a generation counter per key.
///
/// Every invalidation bumps the key's generation; a list that loaded an older
/// generation is stale and must refetch.
#[derive(Debug, Default)]
pub struct InMemoryQueryCache {
    generations: Mutex<HashMap<QueryKey, u64>>,
}

impl InMemoryQueryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryCache for InMemoryQueryCache {
    fn generation(&self, key: &QueryKey) -> u64 {
        lock(&self.generations).get(key).copied().unwrap_or(0)
    }

    fn invalidate(&self, key: &QueryKey) {
        let mut generations = lock(&self.generations);
        let generation = generations.entry(key.clone()).or_insert(0);
        *generation += 1;
        log::debug!("Invalidated query {key} (generation {generation})");
    }
}

/// Notifier writing messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_success(&self, message: &str) {
        log::info!("{message}");
    }

    fn notify_failure(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Record collection held in memory, paginated with `lastId` cursors.
#[derive(Debug)]
pub struct InMemoryRecordReader {
    records: Mutex<Vec<ComplianceRecord>>,
    now: DateTime<Utc>,
    threshold_days: u32,
}

impl InMemoryRecordReader {
    /// Status filters are evaluated relative to `now`.
    pub fn new(records: Vec<ComplianceRecord>, now: DateTime<Utc>, threshold_days: u32) -> Self {
        Self {
            records: Mutex::new(records),
            now,
            threshold_days,
        }
    }

    /// Removes a record, returning whether it existed.
    pub fn remove(&self, id: &RecordId) -> bool {
        let mut records = lock(&self.records);
        let before = records.len();
        records.retain(|record| &record.id != id);
        records.len() != before
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matches(&self, record: &ComplianceRecord, query: &ListQuery) -> bool {
        if let Some(kind) = query.kind {
            if record.kind != kind {
                return false;
            }
        }

        if let Some(status) = query.status {
            if !status.matches(&record.expiry_status_at(self.now, self.threshold_days)) {
                return false;
            }
        }

        if let Some(term) = &query.search {
            let term = term.to_lowercase();
            let haystacks = [
                Some(record.title.as_str()),
                record.reference_number.as_ref().map(|r| r.as_str()),
                record.notes.as_ref().map(|n| n.as_str()),
            ];
            if !haystacks
                .into_iter()
                .flatten()
                .any(|text| text.to_lowercase().contains(&term))
            {
                return false;
            }
        }

        true
    }
}

fn sort_records(records: &mut [ComplianceRecord], sort_by: SortField, direction: SortDirection) {
    match sort_by {
        SortField::ExpiryDate => {
            records.sort_by(|a, b| a.expiry_date.cmp(&b.expiry_date).then(a.id.cmp(&b.id)))
        }
        SortField::Title => records.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then(a.id.cmp(&b.id))
        }),
        SortField::CreatedAt => {
            records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
        }
    }

    if direction == SortDirection::Desc {
        records.reverse();
    }
}

#[async_trait]
impl CollectionReader for InMemoryRecordReader {
    type Item = ComplianceRecord;

    async fn fetch_page(
        &self,
        key: &QueryKey,
        query: &ListQuery,
    ) -> RemoteResult<Page<ComplianceRecord>> {
        let mut matching: Vec<ComplianceRecord> = lock(&self.records)
            .iter()
            .filter(|record| self.matches(record, query))
            .cloned()
            .collect();

        sort_records(&mut matching, query.sort_by, query.direction);

        let last_id = query
            .cursor
            .as_ref()
            .and_then(|cursor| cursor.get("lastId"))
            .and_then(Value::as_str);

        let start = match last_id {
            Some(last_id) => match matching
                .iter()
                .position(|record| record.id.as_str() == last_id)
            {
                Some(index) => index + 1,
                None => {
                    log::warn!("Cursor for {key} points at missing record {last_id}");
                    return Ok(Page::last(Vec::new()));
                }
            },
            None => 0,
        };
        let end = start.saturating_add(query.limit).min(matching.len());
        let items = matching[start..end].to_vec();

        let next_cursor = if end < matching.len() {
            items.last().map(|last| {
                PaginationCursor::new()
                    .with("sortBy", query.sort_by.as_str())
                    .with("lastId", last.id.as_str())
            })
        } else {
            None
        };

        log::debug!(
            "Fetched {} of {} records for {key} starting at {start}",
            items.len(),
            matching.len()
        );

        Ok(Page::new(items, next_cursor))
    }
}
