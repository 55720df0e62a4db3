use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::warn;

use super::Submitter;
use crate::models::{ExtractionResult, PendingFile};

pub const EXTRACT_PATH: &str = "/api/v1/extract";

/// Posts the selected file as a multipart form to a running server.
pub struct HttpSubmitter {
    http: Client,
    endpoint: String,
    field: String,
}

impl HttpSubmitter {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), EXTRACT_PATH),
            field: "file".to_string(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    fn form(&self, file: Option<PendingFile>) -> Form {
        let Some(file) = file else {
            return Form::new();
        };
        let untyped = || Part::bytes(file.bytes().to_vec()).file_name(file.name.clone());
        // Without a usable mime type the part goes out untyped and the server
        // falls back to the extension.
        let part = if file.mime_type.is_empty() {
            untyped()
        } else {
            untyped().mime_str(&file.mime_type).unwrap_or_else(|_| untyped())
        };
        Form::new().part(self.field.clone(), part)
    }
}

#[async_trait]
impl Submitter for HttpSubmitter {
    async fn submit(&self, file: Option<PendingFile>) -> ExtractionResult {
        let response = match self
            .http
            .post(&self.endpoint)
            .multipart(self.form(file))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "Submission request failed");
                return ExtractionResult::failure(e.to_string());
            }
        };

        let status = response.status();
        match response.json::<ExtractionResult>().await {
            Ok(result) if result.is_settled() => result,
            Ok(_) | Err(_) => {
                warn!(endpoint = %self.endpoint, status = %status, "Unexpected submission response");
                ExtractionResult::failure(format!("Server responded with {}", status))
            }
        }
    }
}
