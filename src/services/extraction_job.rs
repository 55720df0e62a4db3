use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::client::Submitter;
use crate::error::JobError;
use crate::models::{ExtractionResult, PendingFile};
use crate::services::model::{DocumentModel, ModelProvider};
use crate::services::staging::{StagedFile, StagingArea};
use crate::services::validation::{ValidationError, ValidationRule};

pub const INVOICE_INSTRUCTION: &str = "Extract invoice data including serial number, customer name, \
product name, quantity, tax, total amount, and date. Return the data in JSON format.";

/// Server-side handling of one submitted document.
///
/// Steps run strictly in order: ensure staging dir, validate, acquire the
/// remote client, stage, upload, generate, remove the staged copy. Nothing
/// escapes [`process`](Self::process) except an [`ExtractionResult`].
pub struct ExtractionJob {
    rule: ValidationRule,
    staging: StagingArea,
    provider: Arc<dyn ModelProvider>,
    instruction: String,
}

impl ExtractionJob {
    pub fn new(rule: ValidationRule, staging: StagingArea, provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            rule,
            staging,
            provider,
            instruction: INVOICE_INSTRUCTION.to_string(),
        }
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    pub fn provider(&self) -> &dyn ModelProvider {
        self.provider.as_ref()
    }

    /// Runs one job under a fresh id.
    pub async fn process(&self, file: Option<PendingFile>) -> ExtractionResult {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.process_for(&request_id, file).await
    }

    /// Runs one job, logging under the id of the request that carried it.
    pub async fn process_for(&self, request_id: &str, file: Option<PendingFile>) -> ExtractionResult {
        let start = Instant::now();

        info!(
            request_id = %request_id,
            file_name = file.as_ref().map(|f| f.name.as_str()).unwrap_or(""),
            file_size = file.as_ref().map(|f| f.size).unwrap_or(0),
            "Starting extraction job"
        );

        match self.run(request_id, file.as_ref()).await {
            Ok(text) => {
                info!(
                    request_id = %request_id,
                    response_length = text.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Extraction job completed"
                );
                ExtractionResult::success(text)
            }
            Err(e) => {
                error!(
                    request_id = %request_id,
                    kind = e.kind(),
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Error processing file"
                );
                ExtractionResult::failure(e.user_message())
            }
        }
    }

    async fn run(&self, request_id: &str, file: Option<&PendingFile>) -> Result<String, JobError> {
        self.staging.ensure().await.map_err(JobError::Staging)?;

        let file = file.ok_or(ValidationError::MissingFile)?;
        let mime_type = self.rule.validate(file)?.mime.clone();

        let model = self.provider.connect()?;

        let staged = self.staging.stage(file).await.map_err(JobError::Staging)?;
        debug!(request_id = %request_id, staged_path = %staged.path().display(), "Staged upload");

        let outcome = self.extract(model.as_ref(), &staged, &mime_type, &file.name).await;
        staged.release().await;
        outcome
    }

    async fn extract(
        &self,
        model: &dyn DocumentModel,
        staged: &StagedFile,
        mime_type: &str,
        display_name: &str,
    ) -> Result<String, JobError> {
        let remote = model
            .upload_document(staged.path(), mime_type, display_name)
            .await?;
        debug!(uri = %remote.uri, mime_type = %remote.mime_type, "Remote file ready");

        let text = model.generate(&remote, &self.instruction).await?;
        Ok(text)
    }
}

#[async_trait]
impl Submitter for ExtractionJob {
    async fn submit(&self, file: Option<PendingFile>) -> ExtractionResult {
        self.process(file).await
    }
}
