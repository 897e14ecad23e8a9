//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{handlers, middleware::logging_layer};
use crate::context::AppContext;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<AppContext>,
}

/// Build the complete API router
pub fn create_router(context: Arc<AppContext>) -> Router {
    let app_state = AppState { context };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/models", get(handlers::list_models))
        // Launch endpoints
        .route("/api/v1/debates", post(handlers::create_debate))
        .route("/api/v1/ideas", post(handlers::create_ideas))
        // Job endpoints
        .route("/api/v1/jobs/:id", get(handlers::get_job))
        .route("/api/v1/jobs/:id/events", get(handlers::job_events))
        .layer(logging_layer())
        .with_state(app_state)
}
