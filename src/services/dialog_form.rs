//! State and submission flow shared by every dialog form.
//!
//! A [`DialogForm`] owns the form data, its initial snapshot, the submitting
//! flag and the inline error. [`DialogForm::submit`] runs the whole
//! validate → submit → success/failure → cleanup sequence so individual
//! dialogs only provide the request itself.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::errors::{NormalizedError, normalize};
use crate::forms::{FormError, first_validation_message};
use crate::repository::Notifier;
use crate::repository::errors::RemoteResult;
use crate::services::BusyFlag;

/// The event that triggered a submission.
pub trait SubmitEvent {
    /// Stops the browser's own form submission.
    fn prevent_default(&mut self);
}

/// Submission triggered programmatically rather than by a form event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEvent;

impl SubmitEvent for NoEvent {
    fn prevent_default(&mut self) {}
}

/// Synchronous check run before submitting; a message aborts the submission.
pub type Validator<'v, T> = &'v dyn Fn(&T) -> Option<String>;

/// Adapts `validator` rules to a dialog validator.
pub fn validate_rules<T: Validate>(data: &T) -> Option<String> {
    data.validate()
        .err()
        .map(|errors| first_validation_message(&errors))
}

#[derive(Clone, Debug)]
pub struct DialogFormOptions {
    /// Shown after a successful submission; `None` keeps the dialog silent.
    pub success_message: Option<String>,
    /// Fallback when a failure carries no message of its own.
    pub error_message: String,
}

impl Default for DialogFormOptions {
    fn default() -> Self {
        Self {
            success_message: None,
            error_message: "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// Callbacks run after a successful submission, in order.
pub struct SubmitCallbacks<'c, R> {
    on_success: Option<Box<dyn FnOnce(&R) + 'c>>,
    on_close: Option<Box<dyn FnOnce() + 'c>>,
}

impl<R> Default for SubmitCallbacks<'_, R> {
    fn default() -> Self {
        Self {
            on_success: None,
            on_close: None,
        }
    }
}

impl<'c, R> SubmitCallbacks<'c, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, callback: impl FnOnce(&R) + 'c) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_close(mut self, callback: impl FnOnce() + 'c) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }
}

/// Result of [`DialogForm::submit`].
#[derive(Debug, PartialEq)]
pub enum SubmitOutcome<R> {
    Submitted(R),
    /// The validator rejected the data; nothing was sent.
    Invalid(NormalizedError),
    Failed(NormalizedError),
}

impl<R> SubmitOutcome<R> {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }
}

/// Per-dialog form state.
pub struct DialogForm<'n, T, N: ?Sized> {
    initial: T,
    data: T,
    submitting: BusyFlag,
    error: Option<String>,
    options: DialogFormOptions,
    notifier: &'n N,
}

impl<'n, T, N> DialogForm<'n, T, N>
where
    T: Clone,
    N: Notifier + ?Sized,
{
    /// Opens the form with `initial` as both the data and the reset snapshot.
    pub fn new(initial: T, notifier: &'n N) -> Self {
        Self {
            data: initial.clone(),
            initial,
            submitting: BusyFlag::new(),
            error: None,
            options: DialogFormOptions::default(),
            notifier,
        }
    }

    pub fn with_options(mut self, options: DialogFormOptions) -> Self {
        self.options = options;
        self
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_busy()
    }

    /// Handle the UI keeps to disable the submit control while a request
    /// is pending.
    pub fn submitting_flag(&self) -> BusyFlag {
        self.submitting.clone()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the data wholesale, e.g. from a controlled component.
    pub fn set_data(&mut self, data: T) {
        self.data = data;
    }

    /// Restores the initial snapshot and clears the error.
    pub fn reset(&mut self) {
        self.data = self.initial.clone();
        self.error = None;
    }

    /// Replaces the initial snapshot (for example after the signed-in
    /// identity changed) and resets the form to it.
    pub fn refresh_defaults(&mut self, initial: T) {
        self.initial = initial;
        self.reset();
    }

    /// Runs the submission sequence.
    ///
    /// The submitting flag is raised only after validation passes and is
    /// lowered on every exit path. On success the callbacks run, the data is
    /// reset, and the configured success message is shown. On failure the
    /// normalized message becomes the inline error and is also shown as a
    /// failure notification.
    pub async fn submit<R, E, Op, Fut>(
        &mut self,
        event: &mut E,
        validator: Option<Validator<'_, T>>,
        operation: Op,
        callbacks: SubmitCallbacks<'_, R>,
    ) -> SubmitOutcome<R>
    where
        E: SubmitEvent + ?Sized,
        Op: FnOnce(T) -> Fut,
        Fut: Future<Output = RemoteResult<R>>,
    {
        event.prevent_default();
        self.error = None;

        if let Some(validate) = validator {
            if let Some(message) = validate(&self.data) {
                self.error = Some(message.clone());
                return SubmitOutcome::Invalid(NormalizedError::validation(message));
            }
        }

        let _submitting = self.submitting.raise();

        match operation(self.data.clone()).await {
            Ok(result) => {
                if let Some(on_success) = callbacks.on_success {
                    on_success(&result);
                }
                if let Some(on_close) = callbacks.on_close {
                    on_close();
                }
                self.data = self.initial.clone();
                if let Some(message) = &self.options.success_message {
                    self.notifier.notify_success(message);
                }
                SubmitOutcome::Submitted(result)
            }
            Err(err) => {
                log::error!("Failed to submit form: {err}");
                let normalized = normalize(&err, &self.options.error_message);
                self.error = Some(normalized.message.clone());
                self.notifier.notify_failure(&normalized.message);
                SubmitOutcome::Failed(normalized)
            }
        }
    }
}

impl<T, N> DialogForm<'_, T, N>
where
    T: Clone + Serialize + DeserializeOwned,
    N: Notifier + ?Sized,
{
    /// Sets `field` from an input's text value.
    pub fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        self.set_field(field, Value::String(value.to_string()))
    }

    /// Sets `field` from an already typed value such as a select option.
    pub fn handle_select_change<V: Serialize>(
        &mut self,
        field: &str,
        value: V,
    ) -> Result<(), FormError> {
        let value = serde_json::to_value(value).map_err(|err| FormError::InvalidFieldValue {
            field: field.to_string(),
            message: err.to_string(),
        })?;
        self.set_field(field, value)
    }

    /// Builds a new data value with one field replaced; the current data is
    /// kept when the new value does not fit.
    fn set_field(&mut self, field: &str, value: Value) -> Result<(), FormError> {
        let invalid = |message: String| FormError::InvalidFieldValue {
            field: field.to_string(),
            message,
        };

        let mut fields = match serde_json::to_value(&self.data) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => return Err(FormError::NotAnObject),
            Err(err) => return Err(invalid(err.to_string())),
        };

        if !fields.contains_key(field) {
            return Err(FormError::UnknownField(field.to_string()));
        }
        fields.insert(field.to_string(), value);

        self.data = serde_json::from_value(Value::Object(fields))
            .map_err(|err| invalid(err.to_string()))?;
        Ok(())
    }
}
