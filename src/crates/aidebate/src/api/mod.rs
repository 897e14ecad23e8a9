//! HTTP API for launching and following jobs
//!
//! - Debate and business idea launches
//! - Job snapshots and server-sent progress events
//! - Provider listing and health

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use response::SuccessResponse;
pub use routes::{create_router, AppState};
