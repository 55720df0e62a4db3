//! Gemini REST client implementing [`DocumentModel`].
//!
//! Upload uses the two-request resumable protocol of the Files API (start,
//! then upload+finalize in one shot); generation is a single
//! `generateContent` call referencing the uploaded file.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::JobError;
use crate::services::model::{DocumentModel, ModelProvider, RemoteError, RemoteFile};

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedFile {
    uri: String,
    mime_type: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    File {
        #[serde(rename = "fileData")]
        file_data: FileData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    mime_type: &'a str,
    file_uri: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GeminiClient {
    pub fn new(http: Client, api_key: String, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    async fn check(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body);
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DocumentModel for GeminiClient {
    async fn upload_document(
        &self,
        path: &Path,
        mime_type: &str,
        display_name: &str,
    ) -> Result<RemoteFile, RemoteError> {
        let content = tokio::fs::read(path).await?;

        let start = self
            .http
            .post(format!("{}/upload/v1beta/files", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", content.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&json!({ "file": { "display_name": display_name } }))
            .send()
            .await?;
        let start = Self::check(start).await?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(RemoteError::MissingUploadUrl)?;

        debug!(bytes = content.len(), mime_type = mime_type, "Uploading document");

        let finalize = self
            .http
            .post(upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(content)
            .send()
            .await?;
        let uploaded: UploadResponse = Self::check(finalize).await?.json().await?;

        info!(uri = %uploaded.file.uri, "Document uploaded");
        Ok(RemoteFile {
            uri: uploaded.file.uri,
            mime_type: uploaded.file.mime_type,
        })
    }

    async fn generate(&self, file: &RemoteFile, instruction: &str) -> Result<String, RemoteError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::File {
                        file_data: FileData {
                            mime_type: &file.mime_type,
                            file_uri: &file.uri,
                        },
                    },
                    Part::Text { text: instruction },
                ],
            }],
        };

        let response = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let generated: GenerateResponse = Self::check(response).await?.json().await?;

        let text: String = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(RemoteError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Builds a [`GeminiClient`] per job from the API key in the environment.
pub struct GeminiProvider {
    http: Client,
    base_url: String,
    model: String,
    api_key_var: String,
}

impl GeminiProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
            api_key_var: GEMINI_API_KEY_VAR.to_string(),
        }
    }

    /// Reads the credential from `var` instead of `GEMINI_API_KEY`.
    pub fn with_api_key_var(mut self, var: impl Into<String>) -> Self {
        self.api_key_var = var.into();
        self
    }

    fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_var)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

impl ModelProvider for GeminiProvider {
    fn connect(&self) -> Result<Box<dyn DocumentModel>, JobError> {
        let api_key = self
            .api_key()
            .ok_or_else(|| JobError::missing_credential(&self.api_key_var))?;
        Ok(Box::new(GeminiClient::new(
            self.http.clone(),
            api_key,
            self.base_url.clone(),
            self.model.clone(),
        )))
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}
