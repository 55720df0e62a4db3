use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing::{debug, info};

use super::selector::SelectionChange;
use super::Submitter;
use crate::models::{ExtractionResult, PendingFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Pending,
    Settled(ExtractionResult),
}

/// What the result area shows. Data and error never render together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView<'a> {
    Empty,
    Data(&'a str),
    Error(&'a str),
}

impl ExtractionResult {
    pub fn view(&self) -> ResultView<'_> {
        match (&self.data, &self.error) {
            (Some(data), _) => ResultView::Data(data),
            (None, Some(error)) => ResultView::Error(error),
            (None, None) => ResultView::Empty,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("A submission is already in progress")]
    AlreadyPending,
}

/// Drives one form: tracks the selected file and the lifecycle of its
/// submission.
pub struct SubmissionController<S> {
    submitter: S,
    field: String,
    selected: Mutex<Option<PendingFile>>,
    state: Mutex<SubmissionState>,
}

impl<S: Submitter> SubmissionController<S> {
    pub fn new(field: impl Into<String>, submitter: S) -> Self {
        Self {
            submitter,
            field: field.into(),
            selected: Mutex::new(None),
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    /// Applies a selector notification. Changes for other fields are ignored.
    /// One file per submission: the first of the collection is kept.
    pub fn on_selection_change(&self, change: &SelectionChange) {
        if change.name != self.field {
            return;
        }
        let file = change.files.as_ref().and_then(|files| files.first().cloned());
        *lock(&self.selected) = file;
    }

    pub fn selected(&self) -> Option<PendingFile> {
        lock(&self.selected).clone()
    }

    pub fn state(&self) -> SubmissionState {
        lock(&self.state).clone()
    }

    pub fn is_pending(&self) -> bool {
        matches!(*lock(&self.state), SubmissionState::Pending)
    }

    pub fn can_submit(&self) -> bool {
        !self.is_pending()
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_pending() {
            "Processing..."
        } else {
            "Process File"
        }
    }

    /// The latest settled result, or the empty initial one.
    pub fn result(&self) -> ExtractionResult {
        match &*lock(&self.state) {
            SubmissionState::Settled(result) => result.clone(),
            _ => ExtractionResult::default(),
        }
    }

    /// Submits the selected file and waits, without timeout, for the job to
    /// settle. Refused while another submission from this controller is in
    /// flight.
    pub async fn submit(&self) -> Result<ExtractionResult, SubmitError> {
        let guard = {
            let mut state = lock(&self.state);
            if *state == SubmissionState::Pending {
                debug!(field = %self.field, "Submit ignored while pending");
                return Err(SubmitError::AlreadyPending);
            }
            let previous = std::mem::replace(&mut *state, SubmissionState::Pending);
            PendingGuard {
                state: &self.state,
                previous: Some(previous),
            }
        };

        let file = self.selected();
        info!(
            field = %self.field,
            file_name = file.as_ref().map(|f| f.name.as_str()).unwrap_or(""),
            "Submitting file"
        );

        let result = self.submitter.submit(file).await;
        guard.settle(result.clone());
        Ok(result)
    }
}

/// Restores the pre-submit state if the submission future is dropped before
/// it settles.
struct PendingGuard<'a> {
    state: &'a Mutex<SubmissionState>,
    previous: Option<SubmissionState>,
}

impl PendingGuard<'_> {
    fn settle(mut self, result: ExtractionResult) {
        self.previous = None;
        *lock(self.state) = SubmissionState::Settled(result);
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *lock(self.state) = previous;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
