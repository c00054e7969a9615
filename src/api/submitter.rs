use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{info, warn};

use super::client::FieldService;
use super::error::{ApiError, SubmitError};
use crate::model::{FieldDraft, FieldResponse, validate};

/// Runs `future`, turning a hang longer than `timeout` into
/// [`ApiError::Timeout`].
pub async fn bounded<T>(
    timeout: Duration,
    future: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    tokio::time::timeout(timeout, future)
        .await
        .map_err(|_| ApiError::Timeout(timeout))?
}

/// Marks a submit as outstanding for as long as it is alive.
struct SavingGuard<'a>(&'a AtomicBool);

impl<'a> SavingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Validates a draft and stores it on the backend.
///
/// Cheap to clone; clones share the service and the in-flight flag, so a
/// clone moved into a background task still blocks a second submit.
#[derive(Debug)]
pub struct FieldSubmitter<S> {
    service: Arc<S>,
    saving: Arc<AtomicBool>,
    timeout: Duration,
}

impl<S> Clone for FieldSubmitter<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            saving: Arc::clone(&self.saving),
            timeout: self.timeout,
        }
    }
}

impl<S: FieldService> FieldSubmitter<S> {
    /// Creates a submitter that bounds each request by `timeout`.
    pub fn new(service: Arc<S>, timeout: Duration) -> Self {
        Self {
            service,
            saving: Arc::new(AtomicBool::new(false)),
            timeout,
        }
    }

    /// Returns `true` while a submit is outstanding.
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Validates `draft`, merges its default value into the choices and
    /// posts the result.
    ///
    /// Nothing is sent when the draft is invalid or another submit is still
    /// outstanding. The draft itself is never modified; the caller decides
    /// what to do with the outcome.
    pub async fn submit(&self, draft: &FieldDraft) -> Result<FieldResponse, SubmitError> {
        let violations = validate(draft);
        if !violations.is_empty() {
            return Err(SubmitError::Invalid(violations));
        }

        let payload = draft.reconciled();
        let violations = validate(&payload);
        if !violations.is_empty() {
            return Err(SubmitError::Invalid(violations));
        }

        let _guard = SavingGuard::acquire(&self.saving).ok_or(SubmitError::InFlight)?;
        info!(label = %payload.label, choices = payload.choices.len(), "submitting field");
        match bounded(self.timeout, self.service.create_field(&payload)).await {
            Ok(created) => {
                info!(id = created.id, label = %created.field.label, "field created");
                Ok(created)
            }
            Err(e) => {
                warn!(error = %e, "field submit failed");
                Err(e.into())
            }
        }
    }
}
