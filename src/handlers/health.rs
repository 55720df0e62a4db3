use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use crate::error::{ApiResult, AppError};
use crate::handlers::AppState;
use crate::middleware::RequestId;
use crate::models::HealthResponse;

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let credential_configured = state.job.provider().is_configured();
    let status = if credential_configured { "healthy" } else { "degraded" };

    info!(
        status = status,
        credential_configured = credential_configured,
        "Health check completed"
    );

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        staging_dir: state.job.staging().root().display().to_string(),
        credential_configured,
    })
}

/// Readiness check: the staging directory must be creatable.
pub async fn ready_handler(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
) -> ApiResult<StatusCode> {
    match state.job.staging().ensure().await {
        Ok(()) => {
            info!(request_id = %request_id, "Readiness check passed");
            Ok(StatusCode::OK)
        }
        Err(e) => {
            warn!(
                request_id = %request_id,
                error = %e,
                "Readiness check failed - staging directory unavailable"
            );
            Err(AppError::service_unavailable("staging directory").with_request_id(request_id))
        }
    }
}
