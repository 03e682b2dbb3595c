//! Delete orchestration for list screens.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::types::{QueryKey, RecordId};
use crate::errors::{NormalizedError, normalize};
use crate::repository::errors::RemoteResult;
use crate::repository::{Notifier, QueryCache};

/// Marker of the record a list instance is currently deleting.
///
/// Owned by the list (clone the handle to share it with row components);
/// never process-wide.
#[derive(Clone, Debug, Default)]
pub struct InFlightSlot {
    current: Arc<Mutex<Option<RecordId>>>,
}

impl InFlightSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<RecordId> {
        self.lock().clone()
    }

    pub fn is_in_flight(&self, id: &RecordId) -> bool {
        self.lock().as_ref() == Some(id)
    }

    fn mark(&self, id: RecordId) -> InFlightGuard {
        *self.lock() = Some(id.clone());
        InFlightGuard {
            slot: self.clone(),
            id,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<RecordId>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the slot on drop, unless a later delete has taken it over.
struct InFlightGuard {
    slot: InFlightSlot,
    id: RecordId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut current = self.slot.lock();
        if current.as_ref() == Some(&self.id) {
            *current = None;
        }
    }
}

/// Notification texts used by [`DeleteOrchestrator`].
#[derive(Clone, Debug)]
pub struct DeleteMessages {
    pub success: String,
    /// Shown when the failure carries no message of its own.
    pub failure: String,
}

impl Default for DeleteMessages {
    fn default() -> Self {
        Self {
            success: "Record deleted".to_string(),
            failure: "Failed to delete record".to_string(),
        }
    }
}

/// Runs deletes against one cached collection.
pub struct DeleteOrchestrator<'a, C: ?Sized, N: ?Sized> {
    cache: &'a C,
    notifier: &'a N,
    query_key: QueryKey,
    messages: DeleteMessages,
}

impl<'a, C, N> DeleteOrchestrator<'a, C, N>
where
    C: QueryCache + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(cache: &'a C, notifier: &'a N, query_key: QueryKey) -> Self {
        Self {
            cache,
            notifier,
            query_key,
            messages: DeleteMessages::default(),
        }
    }

    pub fn with_messages(mut self, messages: DeleteMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn query_key(&self) -> &QueryKey {
        &self.query_key
    }

    /// Deletes `id` through `operation`.
    ///
    /// `slot` holds `id` while the operation runs. On success the collection
    /// is invalidated once and a success notification is shown; on failure
    /// the normalized message is shown and returned, and the cache is left
    /// alone.
    pub async fn delete_item<Op, Fut, T>(
        &self,
        slot: &InFlightSlot,
        id: RecordId,
        operation: Op,
    ) -> Result<(), NormalizedError>
    where
        Op: FnOnce(RecordId) -> Fut,
        Fut: Future<Output = RemoteResult<T>>,
    {
        let _in_flight = slot.mark(id.clone());

        match operation(id.clone()).await {
            Ok(_) => {
                log::info!("Deleted record {id}");
                self.cache.invalidate(&self.query_key);
                self.notifier.notify_success(&self.messages.success);
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to delete record {id}: {err}");
                let normalized = normalize(&err, &self.messages.failure);
                self.notifier.notify_failure(&normalized.message);
                Err(normalized)
            }
        }
    }
}
