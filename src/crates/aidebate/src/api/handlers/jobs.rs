//! Job snapshot and progress event handlers

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
    Json,
};
use futures::{Stream, StreamExt};

use crate::api::{error::ApiResult, middleware::parse_job_id, routes::AppState};
use crate::job::JobRecord;
use crate::progress::ProgressEvent;

/// SSE event name for intermediate snapshots
pub const PROGRESS_EVENT: &str = "progress";
/// SSE event name for the terminal snapshot
pub const DONE_EVENT: &str = "done";

/// Current state of a job
///
/// GET /api/v1/jobs/:id
pub async fn get_job(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<JobRecord>> {
    let job_id = parse_job_id(&id)?;
    let record = app_state.context.publisher().snapshot(job_id)?;
    Ok(Json(record))
}

/// Follow a job as server-sent events
///
/// GET /api/v1/jobs/:id/events
pub async fn job_events(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    let job_id = parse_job_id(&id)?;
    let updates = app_state.context.publisher().subscribe(job_id)?;

    let events = updates.map(|update| match update {
        ProgressEvent::Snapshot(record) => {
            let name = if record.completed { DONE_EVENT } else { PROGRESS_EVENT };
            Event::default().event(name).json_data(&record)
        }
        ProgressEvent::KeepAlive => Ok(Event::default().comment("keep-alive")),
    });

    Ok(Sse::new(events))
}
