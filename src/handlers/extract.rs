use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use std::time::Instant;
use tracing::{info, warn, debug, error};

use crate::error::{ApiResult, AppError, AppResult};
use crate::handlers::AppState;
use crate::middleware::RequestId;
use crate::models::{ExtractionResult, PendingFile};

pub const FILE_FIELD: &str = "file";

/// Runs the extraction job on the `file` field of a multipart form.
///
/// Every outcome of the job itself, including validation failures, is a 200
/// with `{ data, error }`; only an unreadable request body becomes an
/// [`AppError`].
pub async fn extract_handler(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    mut multipart: Multipart,
) -> ApiResult<Json<ExtractionResult>> {
    let start = Instant::now();

    info!(request_id = %request_id, "Starting extraction request");

    let file = match extract_file_from_multipart(&mut multipart).await {
        Ok(Some(file)) => {
            info!(
                request_id = %request_id,
                file_name = %file.name,
                file_size = file.size,
                mime_type = %file.mime_type,
                "File extracted from multipart form"
            );
            Some(file)
        }
        Ok(None) => {
            warn!(request_id = %request_id, "No file in multipart form");
            None
        }
        Err(e) => {
            error!(
                request_id = %request_id,
                limit_mb = state.max_file_size_mb,
                error = %e,
                "Failed to extract file from multipart"
            );
            return Err(e.with_request_id(request_id));
        }
    };

    let result = state.job.process_for(&request_id, file).await;

    info!(
        request_id = %request_id,
        success = result.is_success(),
        total_time_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    Ok(Json(result))
}

async fn extract_file_from_multipart(multipart: &mut Multipart) -> AppResult<Option<PendingFile>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();

        let data = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::FileTooLarge
            } else {
                AppError::from(e)
            }
        })?;

        // Browsers submit an empty, unnamed part when nothing was selected.
        if file_name.is_empty() && data.is_empty() {
            return Ok(None);
        }

        debug!(
            "Extracted file: {} ({} bytes, type: {:?})",
            file_name,
            data.len(),
            content_type
        );

        return Ok(Some(PendingFile::new(file_name, content_type, data)));
    }

    Ok(None)
}
