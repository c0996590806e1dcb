use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" when ready, "degraded" when the API key is missing)
    pub status: String,
    /// API version
    pub version: String,
    /// Whether an OpenWeatherMap API key is configured
    pub credential_configured: bool,
}

/// Health check endpoint.
///
/// Does not call OpenWeatherMap. Returns status "degraded" (still 200) when
/// no API key is configured, since every lookup would then fail.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let credential_configured = state.client.has_credential();

    Json(HealthResponse {
        status: if credential_configured {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        credential_configured,
    })
}
