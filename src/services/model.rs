use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::JobError;

/// Opaque handle to a document held by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub uri: String,
    pub mime_type: String,
}

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Remote request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Remote upload did not return an upload URL")]
    MissingUploadUrl,

    #[error("Remote service returned no text")]
    EmptyResponse,

    #[error("Failed to read staged file: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// The document-understanding capability the extraction job depends on.
#[async_trait]
pub trait DocumentModel: Send + Sync {
    async fn upload_document(
        &self,
        path: &Path,
        mime_type: &str,
        display_name: &str,
    ) -> Result<RemoteFile, RemoteError>;

    async fn generate(&self, file: &RemoteFile, instruction: &str) -> Result<String, RemoteError>;
}

/// Hands out a ready [`DocumentModel`] for one job, resolving credentials at
/// call time.
pub trait ModelProvider: Send + Sync {
    fn connect(&self) -> Result<Box<dyn DocumentModel>, JobError>;

    /// Whether `connect` would currently find its credential.
    fn is_configured(&self) -> bool;
}
