//! Client-side pieces of the upload form: the file selector, the submission
//! controller and the transports it can submit through.

pub mod controller;
pub mod http;
pub mod selector;

use async_trait::async_trait;

use crate::models::{ExtractionResult, PendingFile};

pub use controller::{ResultView, SubmissionController, SubmissionState, SubmitError};
pub use http::{HttpSubmitter, EXTRACT_PATH};
pub use selector::{DragEvent, FileSelector, SelectionChange, UploadMode};

/// Carries one file (or none) to an extraction job and returns its settled
/// result. Transport failures come back as an error result too.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, file: Option<PendingFile>) -> ExtractionResult;
}
