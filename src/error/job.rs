use thiserror::Error;

use crate::services::model::RemoteError;
use crate::services::validation::ValidationError;

pub const GENERIC_FAILURE: &str = "Failed to process file";

/// Everything that can end an extraction job early.
///
/// Cleanup failures are deliberately absent: they are logged where they
/// happen and never reach the caller.
#[derive(Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Configuration(String),

    #[error("Failed to stage file: {0}")]
    Staging(#[source] std::io::Error),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl JobError {
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::Validation(_) => "validation",
            JobError::Configuration(_) => "configuration",
            JobError::Staging(_) => "staging",
            JobError::Remote(_) => "remote",
        }
    }

    pub fn missing_credential(var: &str) -> Self {
        JobError::Configuration(format!("{} environment variable is not set", var))
    }

    /// Message surfaced to the user, falling back to a generic one when the
    /// underlying failure has nothing to say.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message
        }
    }
}
