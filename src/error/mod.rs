pub mod job;
pub mod types;

pub use job::{JobError, GENERIC_FAILURE};
pub use types::{ApiError, ApiResult, AppError, AppResult};
