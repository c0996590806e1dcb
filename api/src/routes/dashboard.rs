//! Human-facing endpoints.
//!
//! - GET /api/v1/report?city=NAME     plain-text report
//! - GET /api/v1/dashboard?city=NAME  chart-ready JSON (AQI gauge + pollutant bars)
//!
//! Both surface failures with the error kind prefix ("Not found: ...") kept.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use crate::errors::{AppError, ErrorResponse};
use crate::routes::lookup::CityQuery;
use crate::routes::AppState;
use crate::services::conditions;
use crate::services::report::{self, DashboardResponse};

/// A report failure, rendered as a prefixed plain-text message.
#[derive(Debug)]
pub struct ReportError(AppError);

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        (status, format!("Report unavailable: {}\n", self.0)).into_response()
    }
}

/// A dashboard failure, rendered as `{ "error": "<prefixed message>" }`.
#[derive(Debug)]
pub struct DashboardError(AppError);

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Multi-section text report for a city.
///
/// Air quality is required; if only the forecast fails, the report is still
/// returned with a "Forecast unavailable" section.
#[utoipa::path(
    get,
    path = "/api/v1/report",
    tag = "Dashboard",
    params(CityQuery),
    responses(
        (status = 200, description = "Text report", body = String, content_type = "text/plain"),
        (status = 404, description = "City not found", body = String, content_type = "text/plain"),
        (status = 502, description = "Air quality unavailable", body = String, content_type = "text/plain"),
    )
)]
pub async fn get_report(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> Result<String, ReportError> {
    let conditions = conditions::city_conditions(&state.client, &params.city)
        .await
        .map_err(ReportError)?;
    Ok(report::render_text_report(&conditions, Utc::now()))
}

/// Chart-ready dashboard data for a city.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    params(CityQuery),
    responses(
        (status = 200, description = "Gauge and pollutant bar series", body = DashboardResponse),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 502, description = "Air quality unavailable", body = ErrorResponse),
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> Result<Json<DashboardResponse>, DashboardError> {
    let location = conditions::geocode_city(&state.client, &params.city)
        .await
        .map_err(DashboardError)?;
    let aq = conditions::air_quality(&state.client, location.latitude, location.longitude)
        .await
        .map_err(DashboardError)?;
    Ok(Json(report::build_dashboard(location, &aq, Utc::now())))
}
