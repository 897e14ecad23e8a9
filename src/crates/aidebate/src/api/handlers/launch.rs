//! Job launch handlers
//!
//! Both endpoints validate synchronously and answer 202 with the new job id;
//! the workflow itself runs in the background. Body rejections go through
//! [`ApiError`](crate::api::ApiError) like every other failure.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::api::{error::ApiResult, models::JobAccepted, routes::AppState};
use crate::workflow::{DebateRequest, IdeaRequest};

/// Start a debate
///
/// POST /api/v1/debates
pub async fn create_debate(
    State(app_state): State<AppState>,
    payload: Result<Json<DebateRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let job_id = app_state.context.start_debate(req)?;
    tracing::info!("Started debate job: {}", job_id);
    Ok((StatusCode::ACCEPTED, Json(JobAccepted::new(job_id))))
}

/// Start a business idea run
///
/// POST /api/v1/ideas
pub async fn create_ideas(
    State(app_state): State<AppState>,
    payload: Result<Json<IdeaRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let job_id = app_state.context.start_business_ideas(req)?;
    tracing::info!("Started business idea job: {}", job_id);
    Ok((StatusCode::ACCEPTED, Json(JobAccepted::new(job_id))))
}
