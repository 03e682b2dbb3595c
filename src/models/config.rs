//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::DEFAULT_EXPIRY_THRESHOLD_DAYS;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::ListQuery;

fn default_page_size() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

fn default_expiry_warning_days() -> u32 {
    DEFAULT_EXPIRY_THRESHOLD_DAYS
}

fn default_reminder_windows() -> Vec<u32> {
    vec![90, 30, 7]
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
/// Settings shared by the client core and the report binary.
pub struct ClientConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Days before expiry at which records are flagged as expiring soon.
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: u32,
    #[serde(default = "default_reminder_windows")]
    pub reminder_windows: Vec<u32>,
}

impl ClientConfig {
    /// First-page query using the configured page size.
    pub fn list_query(&self) -> ListQuery {
        ListQuery::new().limit(self.default_page_size)
    }
}
