pub mod extraction_job;
pub mod gemini;
pub mod model;
pub mod staging;
pub mod validation;

pub use extraction_job::{ExtractionJob, INVOICE_INSTRUCTION};
pub use gemini::{GeminiClient, GeminiProvider, GEMINI_API_KEY_VAR};
pub use model::{DocumentModel, ModelProvider, RemoteError, RemoteFile};
pub use staging::{StagedFile, StagingArea};
pub use validation::{AcceptedType, ValidationError, ValidationRule, DEFAULT_MAX_FILE_SIZE};
