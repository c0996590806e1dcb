//! OpenWeatherMap client.
//!
//! Wraps three endpoints:
//! - Direct geocoding: https://openweathermap.org/api/geocoding-api
//! - Air pollution (current): https://openweathermap.org/api/air-pollution
//! - 5 day / 3 hour forecast: https://openweathermap.org/forecast5

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::config::{ApiKey, AppConfig};
use crate::errors::AppError;
use crate::models::{Forecast, ForecastDay, Location, PollutantReading};

const GEOCODING_PATH: &str = "/geo/1.0/direct";
const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";
const FORECAST_PATH: &str = "/data/2.5/forecast";

/// Forecast entries are 3 hours apart, so every 8th entry is the same hour
/// on the next day.
pub const ENTRIES_PER_DAY: usize = 8;

/// Client for the OpenWeatherMap REST API.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
}

// --- OpenWeatherMap JSON response types ---

#[derive(Debug, Deserialize)]
struct GeocodingCandidate {
    lat: f64,
    lon: f64,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    #[serde(default)]
    list: Option<Vec<AirPollutionEntry>>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    components: PollutantReading,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Option<Vec<ForecastEntry>>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt_txt: String,
    main: ForecastMain,
    #[serde(default)]
    weather: Vec<ForecastWeather>,
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastWeather {
    description: String,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: &str,
        api_key: Option<ApiKey>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            &config.openweather_base_url,
            config.openweather_key.clone(),
            config.request_timeout,
        )
    }

    /// Whether an API key is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Checked before every request so that a missing key never reaches the
    /// network.
    fn api_key(&self) -> Result<&str, AppError> {
        self.api_key.as_ref().map(ApiKey::as_str).ok_or_else(|| {
            AppError::MissingCredential(
                "Missing OPENWEATHER_KEY in environment or .env".to_string(),
            )
        })
    }

    /// Resolve a city name to coordinates, using the first match.
    pub async fn geocode(&self, city: &str) -> Result<Location, AppError> {
        let key = self.api_key()?;
        let candidates: Vec<GeocodingCandidate> = self
            .get_json(GEOCODING_PATH, &[("q", city), ("limit", "1"), ("appid", key)])
            .await?;

        let first = candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("City '{}' not found.", city)))?;

        tracing::debug!("Geocoded '{}' to ({}, {})", city, first.lat, first.lon);

        Ok(Location {
            city: city.to_string(),
            latitude: first.lat,
            longitude: first.lon,
            country: first.country,
        })
    }

    /// Fetch current pollutant concentrations for a location.
    pub async fn fetch_air_pollution(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<PollutantReading, AppError> {
        let key = self.api_key()?;
        let (lat_str, lon_str) = (lat.to_string(), lon.to_string());
        let response: AirPollutionResponse = self
            .get_json(
                AIR_POLLUTION_PATH,
                &[("lat", lat_str.as_str()), ("lon", lon_str.as_str()), ("appid", key)],
            )
            .await?;

        response
            .list
            .and_then(|entries| entries.into_iter().next())
            .map(|entry| entry.components)
            .ok_or_else(|| {
                AppError::UpstreamUnavailable("Air quality data not available".to_string())
            })
    }

    /// Fetch the 3-hourly forecast and sample it down to one entry per day.
    pub async fn fetch_daily_forecast(&self, lat: f64, lon: f64) -> Result<Forecast, AppError> {
        let key = self.api_key()?;
        let (lat_str, lon_str) = (lat.to_string(), lon.to_string());
        let response: ForecastResponse = self
            .get_json(
                FORECAST_PATH,
                &[
                    ("lat", lat_str.as_str()),
                    ("lon", lon_str.as_str()),
                    ("units", "metric"),
                    ("appid", key),
                ],
            )
            .await?;

        let entries = response.list.ok_or_else(|| {
            AppError::UpstreamUnavailable("Weather forecast unavailable".to_string())
        })?;

        Ok(Forecast {
            days: sample_daily(entries),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::CredentialRejected(
                "OpenWeatherMap rejected the API key".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "OpenWeatherMap {} returned HTTP {}",
                path, status
            )));
        }

        response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("OpenWeatherMap JSON parse error: {}", e))
        })
    }
}

/// Keep entries 0, 8, 16, ... of the 3-hourly series. No averaging.
fn sample_daily(entries: Vec<ForecastEntry>) -> Vec<ForecastDay> {
    entries
        .into_iter()
        .step_by(ENTRIES_PER_DAY)
        .map(|entry| ForecastDay {
            date: entry.dt_txt,
            temperature: entry.main.temp,
            description: entry
                .weather
                .into_iter()
                .next()
                .map(|w| w.description)
                .unwrap_or_else(|| "unknown".to_string()),
        })
        .collect()
}
