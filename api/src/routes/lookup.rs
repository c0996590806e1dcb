//! Single-step lookup endpoints.
//!
//! - GET /api/v1/geocode?city=NAME
//! - GET /api/v1/air-quality?lat=LAT&lon=LON
//! - GET /api/v1/forecast?lat=LAT&lon=LON

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::errors::{AppError, ErrorResponse};
use crate::models::{AqiResult, Forecast, Location};
use crate::routes::AppState;
use crate::services::conditions;

#[derive(Debug, Deserialize, IntoParams)]
pub struct CityQuery {
    /// Free-text place name (e.g. "Tehran")
    pub city: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CoordinatesQuery {
    /// Latitude (WGS84)
    pub lat: f64,
    /// Longitude (WGS84)
    pub lon: f64,
}

/// Resolve a city name to coordinates.
#[utoipa::path(
    get,
    path = "/api/v1/geocode",
    tag = "Lookup",
    params(CityQuery),
    responses(
        (status = 200, description = "First geocoding match", body = Location),
        (status = 400, description = "Empty city name", body = ErrorResponse),
        (status = 404, description = "No match for the city name", body = ErrorResponse),
        (status = 503, description = "OPENWEATHER_KEY not configured", body = ErrorResponse),
    )
)]
pub async fn get_geocode(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> Result<Json<Location>, AppError> {
    let location = conditions::geocode_city(&state.client, &params.city).await?;
    Ok(Json(location))
}

/// Current US AQI for a location.
#[utoipa::path(
    get,
    path = "/api/v1/air-quality",
    tag = "Lookup",
    params(CoordinatesQuery),
    responses(
        (status = 200, description = "Composite US AQI with sub-indices", body = AqiResult),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse),
        (status = 422, description = "Concentration outside the AQI tables", body = ErrorResponse),
        (status = 502, description = "OpenWeatherMap returned no usable data", body = ErrorResponse),
        (status = 503, description = "OPENWEATHER_KEY not configured", body = ErrorResponse),
    )
)]
pub async fn get_air_quality(
    State(state): State<AppState>,
    Query(params): Query<CoordinatesQuery>,
) -> Result<Json<AqiResult>, AppError> {
    let result = conditions::air_quality(&state.client, params.lat, params.lon).await?;
    Ok(Json(result))
}

/// One forecast reading per day for a location.
#[utoipa::path(
    get,
    path = "/api/v1/forecast",
    tag = "Lookup",
    params(CoordinatesQuery),
    responses(
        (status = 200, description = "Daily forecast", body = Forecast),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse),
        (status = 502, description = "OpenWeatherMap returned no usable data", body = ErrorResponse),
        (status = 503, description = "OPENWEATHER_KEY not configured", body = ErrorResponse),
    )
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<CoordinatesQuery>,
) -> Result<Json<Forecast>, AppError> {
    let forecast = conditions::weather_forecast(&state.client, params.lat, params.lon).await?;
    Ok(Json(forecast))
}
