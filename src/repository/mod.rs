//! Seams to the collaborators the client core does not implement itself: the
//! REST backend, the query cache, and the toast/notification surface.

use async_trait::async_trait;

use crate::domain::expiry::StatusFilter;
use crate::domain::record::RecordKind;
use crate::domain::types::QueryKey;
use crate::pagination::{
    DEFAULT_ITEMS_PER_PAGE, MAX_ITEMS_PER_PAGE, Page, PaginationCursor, decode_cursor_or_restart,
    encode_cursor,
};
use crate::repository::errors::RemoteResult;

pub mod errors;
pub mod memory;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    ExpiryDate,
    Title,
    CreatedAt,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::ExpiryDate => "expiry_date",
            SortField::Title => "title",
            SortField::CreatedAt => "created_at",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "expiry_date" => Ok(SortField::ExpiryDate),
            "title" => Ok(SortField::Title),
            "created_at" => Ok(SortField::CreatedAt),
            _ => Err(format!("unknown sort field: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("unknown sort direction: {s}")),
        }
    }
}

/// Search, sort, filter and resume position of a collection request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub sort_by: SortField,
    pub direction: SortDirection,
    pub kind: Option<RecordKind>,
    pub status: Option<StatusFilter>,
    pub limit: usize,
    pub cursor: Option<PaginationCursor>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort_by: SortField::default(),
            direction: SortDirection::default(),
            kind: None,
            status: None,
            limit: DEFAULT_ITEMS_PER_PAGE,
            cursor: None,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search term; blank terms clear it.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into().trim().to_string();
        self.search = if term.is_empty() { None } else { Some(term) };
        self
    }

    pub fn sort(mut self, sort_by: SortField, direction: SortDirection) -> Self {
        self.sort_by = sort_by;
        self.direction = direction;
        self
    }

    pub fn kind(mut self, kind: RecordKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the page size; zero falls back to [`DEFAULT_ITEMS_PER_PAGE`] and
    /// larger values are capped at [`MAX_ITEMS_PER_PAGE`].
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = if limit == 0 {
            DEFAULT_ITEMS_PER_PAGE
        } else {
            limit.min(MAX_ITEMS_PER_PAGE)
        };
        self
    }

    pub fn after(mut self, cursor: PaginationCursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Same criteria, starting from the first page.
    pub fn first_page(mut self) -> Self {
        self.cursor = None;
        self
    }

    /// Renders the query as query-string pairs. The cursor is encoded.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        params.push(("sort_by".to_string(), self.sort_by.as_str().to_string()));
        params.push(("sort_dir".to_string(), self.direction.as_str().to_string()));
        if let Some(kind) = self.kind {
            params.push(("kind".to_string(), kind.as_str().to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status".to_string(), status.as_str().to_string()));
        }
        params.push(("limit".to_string(), self.limit.to_string()));
        if let Some(cursor) = &self.cursor {
            params.push(("cursor".to_string(), encode_cursor(cursor)));
        }

        params
    }

    /// Parses query-string pairs produced by [`ListQuery::to_params`].
    ///
    /// Unknown keys and unparseable values are skipped. A malformed cursor
    /// restarts pagination from the first page.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::new();

        for (key, value) in params {
            let value = value.as_ref();
            match key.as_ref() {
                "search" => query = query.search(value),
                "sort_by" => match value.parse() {
                    Ok(field) => query.sort_by = field,
                    Err(err) => log::warn!("Ignoring list parameter: {err}"),
                },
                "sort_dir" => match value.parse() {
                    Ok(direction) => query.direction = direction,
                    Err(err) => log::warn!("Ignoring list parameter: {err}"),
                },
                "kind" => match value.parse() {
                    Ok(kind) => query.kind = Some(kind),
                    Err(err) => log::warn!("Ignoring list parameter: {err}"),
                },
                "status" => match value.parse() {
                    Ok(status) => query.status = Some(status),
                    Err(err) => log::warn!("Ignoring list parameter: {err}"),
                },
                "limit" => match value.trim().parse::<usize>() {
                    Ok(limit) => query = query.limit(limit),
                    Err(err) => log::warn!("Ignoring list limit {value:?}: {err}"),
                },
                "cursor" => query.cursor = decode_cursor_or_restart(Some(value)),
                _ => {}
            }
        }

        query
    }
}

/// Fetches pages of a cached collection from the backend.
#[async_trait]
pub trait CollectionReader {
    type Item: Send;

    async fn fetch_page(&self, key: &QueryKey, query: &ListQuery)
    -> RemoteResult<Page<Self::Item>>;
}

/// Client-side query cache; invalidation makes subscribers refetch.
pub trait QueryCache {
    fn invalidate(&self, key: &QueryKey);

    /// Number of invalidations of `key` so far. A list that loaded an older
    /// generation is stale.
    fn generation(&self, key: &QueryKey) -> u64;
}

/// Transient success/failure messages shown to the user.
pub trait Notifier {
    fn notify_success(&self, message: &str);
    fn notify_failure(&self, message: &str);
}
