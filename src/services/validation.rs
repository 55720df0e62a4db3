//! File acceptance rules shared by the selector and the extraction job.
//!
//! Both sides run the same [`ValidationRule::validate`]; they differ only in
//! the rule they are configured with. The job never trusts a selector's
//! verdict.

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::models::PendingFile;

pub const DEFAULT_MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

/// One accepted document type: a mime prefix plus the filename extensions
/// that stand in for it when the declared mime type is missing or wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedType {
    pub mime: String,
    pub extensions: Vec<String>,
    pub label: String,
}

impl AcceptedType {
    pub fn new(mime: &str, extensions: &[&str], label: &str) -> Self {
        Self {
            mime: mime.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            label: label.to_string(),
        }
    }

    fn matches_mime(&self, mime_type: &str) -> bool {
        mime_type.starts_with(&self.mime)
    }

    fn matches_name(&self, lowercase_name: &str) -> bool {
        self.extensions.iter().any(|ext| lowercase_name.ends_with(ext.as_str()))
    }
}

static SERVER_TYPES: Lazy<Vec<AcceptedType>> = Lazy::new(|| {
    vec![
        AcceptedType::new("application/pdf", &[".pdf"], "PDF"),
        AcceptedType::new("image/jpeg", &[".jpeg", ".jpg"], "JPEG"),
        AcceptedType::new("image/png", &[".png"], "PNG"),
    ]
});

// The selector offers WEBP as well; the job rejects it.
static SELECTOR_TYPES: Lazy<Vec<AcceptedType>> = Lazy::new(|| {
    let mut types = SERVER_TYPES.clone();
    types.push(AcceptedType::new("image/webp", &[".webp"], "WEBP"));
    types
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No file provided")]
    MissingFile,

    #[error("File size exceeds the maximum allowed size")]
    TooLarge { size: usize, limit: usize },

    #[error("Invalid file type. Allowed types: {allowed}")]
    TypeNotAccepted { allowed: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRule {
    pub max_size_bytes: usize,
    pub accepted: Vec<AcceptedType>,
}

impl ValidationRule {
    pub fn new(max_size_bytes: usize, accepted: Vec<AcceptedType>) -> Self {
        Self {
            max_size_bytes,
            accepted,
        }
    }

    /// PDF, JPEG and PNG up to `max_size_bytes`.
    pub fn server(max_size_bytes: usize) -> Self {
        Self::new(max_size_bytes, SERVER_TYPES.clone())
    }

    /// The server types plus WEBP.
    pub fn selector(max_size_bytes: usize) -> Self {
        Self::new(max_size_bytes, SELECTOR_TYPES.clone())
    }

    /// Checks size first, then type. On success returns the accepted type the
    /// file matched; a declared mime match wins over an extension match.
    pub fn validate(&self, file: &PendingFile) -> Result<&AcceptedType, ValidationError> {
        if file.size > self.max_size_bytes {
            return Err(ValidationError::TooLarge {
                size: file.size,
                limit: self.max_size_bytes,
            });
        }

        let name = file.name.to_lowercase();
        self.accepted
            .iter()
            .find(|t| t.matches_mime(&file.mime_type))
            .or_else(|| self.accepted.iter().find(|t| t.matches_name(&name)))
            .ok_or_else(|| ValidationError::TypeNotAccepted {
                allowed: self.allowed_labels(),
            })
    }

    pub fn allowed_labels(&self) -> String {
        self.accepted
            .iter()
            .map(|t| t.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Value for an HTML `accept` attribute: every extension followed by its
    /// mime type.
    pub fn accept_attribute(&self) -> String {
        self.accepted
            .iter()
            .flat_map(|t| t.extensions.iter().map(String::as_str).chain(std::iter::once(t.mime.as_str())))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for ValidationRule {
    fn default() -> Self {
        Self::server(DEFAULT_MAX_FILE_SIZE)
    }
}
