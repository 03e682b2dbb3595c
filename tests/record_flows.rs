use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use compliance_client::RECORDS_QUERY_KEY;
use compliance_client::domain::expiry::StatusFilter;
use compliance_client::domain::record::{ComplianceRecord, NewRecord, RecordKind};
use compliance_client::domain::types::{QueryKey, RecordId, RecordTitle};
use compliance_client::errors::ErrorCategory;
use compliance_client::forms::account::ChangePasswordForm;
use compliance_client::forms::record::RecordForm;
use compliance_client::repository::errors::{ApiErrorBody, RemoteError};
use compliance_client::repository::memory::{InMemoryQueryCache, InMemoryRecordReader};
use compliance_client::repository::{Notifier, QueryCache};
use compliance_client::services::delete::{DeleteOrchestrator, InFlightSlot};
use compliance_client::services::dialog_form::{
    DialogForm, DialogFormOptions, NoEvent, SubmitCallbacks, SubmitOutcome, Validator,
};
use compliance_client::services::list::ListState;

#[derive(Debug, PartialEq)]
enum Toast {
    Success(String),
    Failure(String),
}

#[derive(Default)]
struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    fn toasts(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock().unwrap())
    }
}

impl Notifier for RecordingNotifier {
    fn notify_success(&self, message: &str) {
        self.toasts
            .lock()
            .unwrap()
            .push(Toast::Success(message.to_string()));
    }

    fn notify_failure(&self, message: &str) {
        self.toasts
            .lock()
            .unwrap()
            .push(Toast::Failure(message.to_string()));
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 20, 10, 0, 0).unwrap()
}

fn record(id: &str, title: &str, days: i64) -> ComplianceRecord {
    ComplianceRecord {
        id: RecordId::new(id).unwrap(),
        kind: RecordKind::VehicleLicence,
        title: RecordTitle::new(title).unwrap(),
        reference_number: None,
        expiry_date: now() + Duration::days(days),
        notes: None,
        created_at: now() - Duration::days(30),
    }
}

fn key() -> QueryKey {
    QueryKey::new(RECORDS_QUERY_KEY).unwrap()
}

#[tokio::test]
async fn test_delete_invalidates_and_list_refetches() {
    let reader = InMemoryRecordReader::new(
        vec![
            record("r-1", "Hilux disc", 10),
            record("r-2", "Polo disc", 40),
            record("r-3", "Trailer disc", -2),
        ],
        now(),
        30,
    );
    let cache = InMemoryQueryCache::new();
    let notifier = RecordingNotifier::default();
    let mut list = ListState::new(key());

    assert_eq!(list.refresh_if_stale(&reader, &cache).await, Ok(true));
    assert_eq!(list.items().len(), 3);

    let orchestrator = DeleteOrchestrator::new(&cache, &notifier, key());
    let slot = InFlightSlot::new();
    let backend = &reader;

    orchestrator
        .delete_item(&slot, RecordId::new("r-1").unwrap(), |id| async move {
            if backend.remove(&id) {
                Ok(())
            } else {
                Err(RemoteError::Unknown)
            }
        })
        .await
        .unwrap();

    assert_eq!(slot.current(), None);
    assert_eq!(cache.generation(&key()), 1);
    assert_eq!(notifier.toasts(), vec![Toast::Success("Record deleted".into())]);

    assert!(list.is_stale(&cache));
    assert_eq!(list.refresh_if_stale(&reader, &cache).await, Ok(true));
    let ids: Vec<_> = list.items().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r-3", "r-2"]);
}

#[tokio::test]
async fn test_failed_delete_keeps_list_fresh() {
    let reader = InMemoryRecordReader::new(vec![record("r-1", "Hilux disc", 10)], now(), 30);
    let cache = InMemoryQueryCache::new();
    let notifier = RecordingNotifier::default();
    let mut list = ListState::new(key());
    list.refresh_if_stale(&reader, &cache).await.unwrap();

    let orchestrator = DeleteOrchestrator::new(&cache, &notifier, key());
    let slot = InFlightSlot::new();

    let err = orchestrator
        .delete_item(&slot, RecordId::new("r-1").unwrap(), |_| async {
            Err::<(), _>(RemoteError::Backend {
                status: 403,
                body: ApiErrorBody {
                    error: None,
                    message: Some("Not allowed".to_string()),
                },
            })
        })
        .await
        .unwrap_err();

    assert_eq!(err.message, "Not allowed");
    assert_eq!(notifier.toasts(), vec![Toast::Failure("Not allowed".into())]);
    assert_eq!(slot.current(), None);
    assert!(!list.is_stale(&cache));
    assert_eq!(reader.len(), 1);
}

#[tokio::test]
async fn test_filters_restart_pagination() {
    let records = (1..=25)
        .map(|n| record(&format!("r-{n:02}"), &format!("Disc {n:02}"), n))
        .collect();
    let reader = InMemoryRecordReader::new(records, now(), 30);
    let mut list = ListState::new(key());

    assert_eq!(list.load_first_page(&reader).await, Ok(20));
    assert!(list.has_more());

    assert!(list.set_status(Some(StatusFilter::Valid)));
    assert!(list.items().is_empty());
    assert!(list.next_cursor().is_none());

    assert_eq!(list.load_first_page(&reader).await, Ok(0));
    assert!(!list.has_more());

    assert!(list.set_status(Some(StatusFilter::ExpiringSoon)));
    assert_eq!(list.load_first_page(&reader).await, Ok(20));
    assert_eq!(list.load_more(&reader).await, Ok(5));
    assert!(!list.has_more());
}

#[tokio::test]
async fn test_password_mismatch_never_reaches_backend() {
    let notifier = RecordingNotifier::default();
    let mut form = DialogForm::new(ChangePasswordForm::default(), &notifier);
    form.handle_change("current_password", "hunter22").unwrap();
    form.handle_change("new_password", "correct-horse").unwrap();
    form.handle_change("confirm_password", "correct-hose").unwrap();

    let calls = Mutex::new(0);
    let validator: Validator<'_, ChangePasswordForm> = &|data| data.passwords_match();

    let outcome = form
        .submit(
            &mut NoEvent,
            Some(validator),
            |_| async {
                *calls.lock().unwrap() += 1;
                Ok::<_, RemoteError>(())
            },
            SubmitCallbacks::new(),
        )
        .await;

    match outcome {
        SubmitOutcome::Invalid(err) => {
            assert_eq!(err.message, "Passwords do not match");
            assert_eq!(err.category, ErrorCategory::Validation);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(*calls.lock().unwrap(), 0);
    assert!(!form.is_submitting());
    assert!(notifier.toasts().is_empty());
}

#[tokio::test]
async fn test_record_dialog_creates_and_invalidates() {
    let notifier = RecordingNotifier::default();
    let cache = InMemoryQueryCache::new();
    let created = Mutex::new(Vec::new());

    let mut form = DialogForm::new(RecordForm::default(), &notifier).with_options(
        DialogFormOptions {
            success_message: Some("Record added".to_string()),
            ..DialogFormOptions::default()
        },
    );
    form.handle_select_change("kind", RecordKind::FirearmLicence)
        .unwrap();
    form.handle_change("title", "Competency certificate")
        .unwrap();
    form.handle_change("expiry_date", "2027-01-15").unwrap();

    let outcome = form
        .submit(
            &mut NoEvent,
            None,
            |data: RecordForm| async {
                match NewRecord::try_from(data) {
                    Ok(payload) => {
                        created.lock().unwrap().push(payload);
                        Ok(())
                    }
                    Err(err) => Err(RemoteError::Text(err.to_string())),
                }
            },
            SubmitCallbacks::new().on_success(|_: &()| cache.invalidate(&key())),
        )
        .await;

    assert!(outcome.is_submitted());
    assert_eq!(cache.generation(&key()), 1);
    assert_eq!(notifier.toasts(), vec![Toast::Success("Record added".into())]);

    let created = created.into_inner().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].title.as_str(), "Competency certificate");
    assert_eq!(form.data(), &RecordForm::default());
}

#[tokio::test]
async fn test_invalid_record_surfaces_inline_error() {
    let notifier = RecordingNotifier::default();
    let mut form = DialogForm::new(RecordForm::default(), &notifier);
    form.handle_change("title", "Licence").unwrap();
    form.handle_change("expiry_date", "whenever").unwrap();

    let outcome = form
        .submit(
            &mut NoEvent,
            None,
            |data: RecordForm| async {
                NewRecord::try_from(data)
                    .map(|_| ())
                    .map_err(|err| RemoteError::Text(err.to_string()))
            },
            SubmitCallbacks::new(),
        )
        .await;

    match outcome {
        SubmitOutcome::Failed(err) => {
            assert_eq!(err.category, ErrorCategory::Unknown);
            assert_eq!(err.message, "record type is required");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(form.error(), Some("record type is required"));
    assert_eq!(
        notifier.toasts(),
        vec![Toast::Failure("record type is required".into())]
    );
}
