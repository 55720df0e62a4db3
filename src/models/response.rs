use serde::{Deserialize, Serialize};

/// Outcome of one extraction request, as rendered by the UI layer.
///
/// Both fields are `None` only before anything has been submitted. A settled
/// result carries exactly one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub data: Option<String>,
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn success(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.data.is_some() || self.error.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub staging_dir: String,
    pub credential_configured: bool,
}
