//! Invoice extraction service
//!
//! Accepts a PDF or image upload, stages it for the duration of one job,
//! hands it to a remote document-understanding model and relays the model's
//! JSON-shaped answer back as `{ data, error }`. The `client` module holds the
//! form-side state machines that feed the job.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult, JobError};
pub use models::{ExtractionResult, PendingFile};
