//! Path parameter validation

use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};

/// Parse a job id taken from the URL path.
pub fn parse_job_id(value: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| ApiError::BadRequest(format!("Invalid job id: {}", value)))
}
