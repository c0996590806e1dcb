//! Geocode → air quality + forecast resolution.
//!
//! The three single-step operations back both the REST endpoints and the
//! agent tools. `city_conditions` chains them for the report and dashboard:
//! geocoding must finish first, then air quality and forecast are fetched
//! concurrently and joined.

use crate::errors::AppError;
use crate::models::{AqiResult, Forecast, Location};
use crate::services::aqi;
use crate::services::openweather::OpenWeatherClient;

/// Everything the report and dashboard need for one city.
#[derive(Debug)]
pub struct CityConditions {
    pub location: Location,
    pub air_quality: AqiResult,
    /// Kept separate so a forecast outage does not hide the air quality.
    pub forecast: Result<Forecast, AppError>,
}

/// Reject blank names before spending a request on them.
pub fn validate_city(city: &str) -> Result<&str, AppError> {
    let trimmed = city.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("city must not be empty".to_string()));
    }
    Ok(trimmed)
}

/// Latitude must be within ±90, longitude within ±180. NaN fails both checks.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), AppError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::BadRequest(format!(
            "lat must be between -90 and 90, got {}",
            lat
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::BadRequest(format!(
            "lon must be between -180 and 180, got {}",
            lon
        )));
    }
    Ok(())
}

pub async fn geocode_city(client: &OpenWeatherClient, city: &str) -> Result<Location, AppError> {
    let city = validate_city(city)?;
    client.geocode(city).await
}

pub async fn air_quality(
    client: &OpenWeatherClient,
    lat: f64,
    lon: f64,
) -> Result<AqiResult, AppError> {
    validate_coordinates(lat, lon)?;
    let components = client.fetch_air_pollution(lat, lon).await?;
    let result = aqi::assess(components)?;
    tracing::debug!(
        "AQI at ({}, {}): {} (pm2.5={}, pm10={})",
        lat,
        lon,
        result.us_aqi,
        result.aqi_pm25,
        result.aqi_pm10
    );
    Ok(result)
}

pub async fn weather_forecast(
    client: &OpenWeatherClient,
    lat: f64,
    lon: f64,
) -> Result<Forecast, AppError> {
    validate_coordinates(lat, lon)?;
    client.fetch_daily_forecast(lat, lon).await
}

/// Resolve a city and fetch its air quality and forecast.
///
/// Fails if geocoding or air quality fails; a forecast failure is carried in
/// `CityConditions::forecast`.
pub async fn city_conditions(
    client: &OpenWeatherClient,
    city: &str,
) -> Result<CityConditions, AppError> {
    let location = geocode_city(client, city).await?;

    let (aqi_result, forecast) = futures::join!(
        air_quality(client, location.latitude, location.longitude),
        weather_forecast(client, location.latitude, location.longitude),
    );

    if let Err(ref e) = forecast {
        tracing::warn!("Forecast for '{}' unavailable: {}", location.city, e);
    }

    Ok(CityConditions {
        location,
        air_quality: aqi_result?,
        forecast,
    })
}
