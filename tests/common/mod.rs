//! Network-free stand-ins for the remote extraction service.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use invoice_extract::error::JobError;
use invoice_extract::models::PendingFile;
use invoice_extract::services::{
    DocumentModel, ExtractionJob, ModelProvider, RemoteError, RemoteFile, StagingArea,
    ValidationRule, GEMINI_API_KEY_VAR,
};

pub const CANNED_JSON: &str = r#"{"serialNumber":"INV-001","customerName":"Acme","productName":"Widget","quantity":2,"tax":10,"totalAmount":110,"date":"2024-01-15"}"#;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload {
        path: PathBuf,
        existed: bool,
        bytes: usize,
        mime_type: String,
        display_name: String,
    },
    Generate {
        uri: String,
        instruction: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Succeed,
    FailUpload,
    FailGenerate,
    PanicGenerate,
}

pub struct FakeModel {
    behavior: Behavior,
    calls: Arc<Mutex<Vec<Call>>>,
}

#[async_trait]
impl DocumentModel for FakeModel {
    async fn upload_document(
        &self,
        path: &Path,
        mime_type: &str,
        display_name: &str,
    ) -> Result<RemoteFile, RemoteError> {
        let bytes = std::fs::read(path).map(|b| b.len()).unwrap_or(0);
        self.calls.lock().unwrap().push(Call::Upload {
            path: path.to_path_buf(),
            existed: path.exists(),
            bytes,
            mime_type: mime_type.to_string(),
            display_name: display_name.to_string(),
        });
        if self.behavior == Behavior::FailUpload {
            return Err(RemoteError::Api {
                status: 503,
                message: "upload rejected".to_string(),
            });
        }
        Ok(RemoteFile {
            uri: "https://files.example/abc123".to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    async fn generate(&self, file: &RemoteFile, instruction: &str) -> Result<String, RemoteError> {
        self.calls.lock().unwrap().push(Call::Generate {
            uri: file.uri.clone(),
            instruction: instruction.to_string(),
        });
        match self.behavior {
            Behavior::FailGenerate => Err(RemoteError::Other("model overloaded".to_string())),
            Behavior::PanicGenerate => panic!("generation blew up"),
            _ => Ok(CANNED_JSON.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct FakeProvider {
    pub behavior: Behavior,
    pub configured: bool,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeProvider {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            configured: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new(Behavior::Succeed)
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl ModelProvider for FakeProvider {
    fn connect(&self) -> Result<Box<dyn DocumentModel>, JobError> {
        if !self.configured {
            return Err(JobError::missing_credential(GEMINI_API_KEY_VAR));
        }
        Ok(Box::new(FakeModel {
            behavior: self.behavior,
            calls: self.calls.clone(),
        }))
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

pub fn job_with(provider: FakeProvider, staging_dir: &Path) -> ExtractionJob {
    ExtractionJob::new(
        ValidationRule::default(),
        StagingArea::new(staging_dir),
        Arc::new(provider),
    )
}

pub fn staged_entries(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok().map(|e| e.path())).collect(),
        Err(_) => Vec::new(),
    }
}

pub fn jpeg(name: &str, size: usize) -> PendingFile {
    PendingFile::new(name, "image/jpeg", vec![0xFFu8; size])
}

pub fn pdf(name: &str, size: usize) -> PendingFile {
    let mut content = b"%PDF-1.4\n".to_vec();
    content.resize(size.max(content.len()), b' ');
    PendingFile::new(name, "application/pdf", content)
}
