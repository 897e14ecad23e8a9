//! Provider listing

use axum::{extract::State, response::IntoResponse};
use llm::Provider;

use crate::api::{models::ProviderInfo, response, routes::AppState};

/// List every provider identifier and whether it can be selected
///
/// GET /api/v1/models
pub async fn list_models(State(app_state): State<AppState>) -> impl IntoResponse {
    let registry = app_state.context.registry();
    let providers: Vec<ProviderInfo> = Provider::ALL
        .into_iter()
        .map(|provider| ProviderInfo {
            id: provider,
            configured: registry.is_configured(provider),
            model: registry
                .resolve(provider)
                .ok()
                .map(|binding| binding.model.model_name().to_string()),
        })
        .collect();

    response::ok(providers)
}
