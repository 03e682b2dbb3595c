//! Paginated list state: criteria, loaded items and load status.

use crate::domain::expiry::StatusFilter;
use crate::domain::record::RecordKind;
use crate::domain::types::QueryKey;
use crate::errors::{NormalizedError, normalize};
use crate::pagination::{Page, PaginationCursor, decode_cursor};
use crate::repository::{CollectionReader, ListQuery, QueryCache, SortDirection, SortField};
use crate::services::BusyFlag;

const DEFAULT_LOAD_ERROR: &str = "Failed to load records";

/// State behind one list screen.
///
/// Items accumulate across `load_more` calls. Changing any criterion drops
/// the loaded items and the cursor, so the next load starts over.
#[derive(Debug)]
pub struct ListState<T> {
    key: QueryKey,
    query: ListQuery,
    items: Vec<T>,
    next_cursor: Option<PaginationCursor>,
    loading: BusyFlag,
    error: Option<NormalizedError>,
    loaded_generation: Option<u64>,
    error_message: String,
}

impl<T> ListState<T> {
    pub fn new(key: QueryKey) -> Self {
        Self::with_query(key, ListQuery::new())
    }

    /// Restores a list from saved criteria, e.g. parsed query-string params.
    /// A cursor in `query` is where the first load resumes.
    pub fn with_query(key: QueryKey, query: ListQuery) -> Self {
        Self {
            key,
            query,
            items: Vec::new(),
            next_cursor: None,
            loading: BusyFlag::new(),
            error: None,
            loaded_generation: None,
            error_message: DEFAULT_LOAD_ERROR.to_string(),
        }
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_busy()
    }

    /// Handle the UI keeps to show a spinner while a page is loading.
    pub fn loading_flag(&self) -> BusyFlag {
        self.loading.clone()
    }

    pub fn error(&self) -> Option<&NormalizedError> {
        self.error.as_ref()
    }

    pub fn next_cursor(&self) -> Option<&PaginationCursor> {
        self.next_cursor.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Query-string pairs describing the current criteria.
    pub fn to_params(&self) -> Vec<(String, String)> {
        self.query.to_params()
    }

    pub fn set_search(&mut self, term: &str) -> bool {
        self.update(|query| query.search(term))
    }

    pub fn set_sort(&mut self, sort_by: SortField, direction: SortDirection) -> bool {
        self.update(|query| query.sort(sort_by, direction))
    }

    pub fn set_kind(&mut self, kind: Option<RecordKind>) -> bool {
        self.update(|mut query| {
            query.kind = kind;
            query
        })
    }

    pub fn set_status(&mut self, status: Option<StatusFilter>) -> bool {
        self.update(|mut query| {
            query.status = status;
            query
        })
    }

    pub fn set_limit(&mut self, limit: usize) -> bool {
        self.update(|query| query.limit(limit))
    }

    /// Resumes from an encoded cursor, e.g. one kept in a deep link.
    ///
    /// A malformed cursor restarts from the first page and is reported as a
    /// cursor error.
    pub fn resume_at(&mut self, encoded: &str) -> Result<(), NormalizedError> {
        match decode_cursor(encoded) {
            Ok(cursor) => {
                self.update(|query| query.after(cursor));
                Ok(())
            }
            Err(err) => {
                log::warn!("Restarting {} from the first page: {err}", self.key);
                self.update(ListQuery::first_page);
                let normalized = NormalizedError::from(err);
                self.error = Some(normalized.clone());
                Err(normalized)
            }
        }
    }

    /// Applies new criteria. Returns whether anything changed; an unchanged
    /// query keeps the loaded pages.
    fn update(&mut self, change: impl FnOnce(ListQuery) -> ListQuery) -> bool {
        let query = change(self.query.clone().first_page());
        if query == self.query {
            return false;
        }

        self.query = query;
        self.items.clear();
        self.next_cursor = None;
        self.error = None;
        self.loaded_generation = None;
        true
    }

    /// Whether the cache was invalidated since the last refresh.
    pub fn is_stale<C>(&self, cache: &C) -> bool
    where
        C: QueryCache + ?Sized,
    {
        self.loaded_generation != Some(cache.generation(&self.key))
    }

    /// Replaces the items with the first page for the current criteria.
    /// Returns the number of items loaded.
    pub async fn load_first_page<R>(&mut self, reader: &R) -> Result<usize, NormalizedError>
    where
        R: CollectionReader<Item = T> + ?Sized,
    {
        let query = self.query.clone();
        let page = self.fetch(reader, &query).await?;

        let count = page.items.len();
        self.items = page.items;
        self.next_cursor = page.next_cursor;
        Ok(count)
    }

    /// Appends the page after the last one loaded. Does nothing once the
    /// collection is exhausted.
    pub async fn load_more<R>(&mut self, reader: &R) -> Result<usize, NormalizedError>
    where
        R: CollectionReader<Item = T> + ?Sized,
    {
        let Some(cursor) = self.next_cursor.clone() else {
            return Ok(0);
        };

        let query = self.query.clone().after(cursor);
        let page = self.fetch(reader, &query).await?;

        let count = page.items.len();
        self.items.extend(page.items);
        self.next_cursor = page.next_cursor;
        Ok(count)
    }

    /// Reloads the first page if the cache generation moved since the last
    /// refresh. Returns whether a reload happened.
    pub async fn refresh_if_stale<R, C>(
        &mut self,
        reader: &R,
        cache: &C,
    ) -> Result<bool, NormalizedError>
    where
        R: CollectionReader<Item = T> + ?Sized,
        C: QueryCache + ?Sized,
    {
        let generation = cache.generation(&self.key);
        if self.loaded_generation == Some(generation) {
            return Ok(false);
        }

        self.query = self.query.clone().first_page();
        self.load_first_page(reader).await?;
        self.loaded_generation = Some(generation);
        Ok(true)
    }

    async fn fetch<R>(&mut self, reader: &R, query: &ListQuery) -> Result<Page<T>, NormalizedError>
    where
        R: CollectionReader<Item = T> + ?Sized,
    {
        self.error = None;
        let _loading = self.loading.raise();

        match reader.fetch_page(&self.key, query).await {
            Ok(page) => Ok(page),
            Err(err) => {
                log::error!("Failed to load {}: {err}", self.key);
                let normalized = normalize(&err, &self.error_message);
                self.error = Some(normalized.clone());
                Err(normalized)
            }
        }
    }
}
