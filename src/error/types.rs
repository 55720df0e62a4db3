use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Result of a handler; the error side knows which request it answers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures at the HTTP boundary, before a request reaches the extraction job.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("File size exceeds the maximum allowed size")]
    FileTooLarge,

    #[error("Invalid upload: {message}")]
    InvalidFile { message: String },

    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::FileTooLarge => "FILE_TOO_LARGE",
            AppError::InvalidFile { .. } => "INVALID_FILE",
            AppError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InvalidFile { .. } => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn with_request_id(self, request_id: impl Into<String>) -> ApiError {
        ApiError {
            request_id: request_id.into(),
            error: self,
        }
    }
}

/// An [`AppError`] bound to the request it answers.
#[derive(Debug)]
pub struct ApiError {
    pub request_id: String,
    pub error: AppError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let error_code = self.error.error_code();
        let message = self.error.to_string();
        let timestamp = chrono::Utc::now().to_rfc3339();

        tracing::error!(
            error_code = error_code,
            status_code = %status,
            request_id = %self.request_id,
            error_message = %message,
            "API error occurred"
        );

        // Same `{ data, error }` shape the extraction job answers with, so a
        // client never has to branch on the failure origin.
        let body = Json(json!({
            "data": null,
            "error": message,
            "code": error_code,
            "request_id": self.request_id,
            "timestamp": timestamp
        }));

        (status, body).into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::invalid_file(format!("Failed to read multipart body: {}", err.body_text()))
    }
}

impl AppError {
    pub fn invalid_file(message: impl Into<String>) -> Self {
        AppError::InvalidFile {
            message: message.into(),
        }
    }

    pub fn service_unavailable(service: impl Into<String>) -> Self {
        AppError::ServiceUnavailable {
            service: service.into(),
        }
    }
}
