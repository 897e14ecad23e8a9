//! Health check endpoint handler

use axum::{extract::State, response::IntoResponse};

use crate::api::{models::HealthResponse, response, routes::AppState};

/// Handler for GET /health
pub async fn health(State(app_state): State<AppState>) -> impl IntoResponse {
    let context = &app_state.context;
    let health = HealthResponse::new(
        "ok",
        context.config().server.name.clone(),
        context.store().len(),
        context.registry().configured().len(),
    );
    response::ok(health)
}
