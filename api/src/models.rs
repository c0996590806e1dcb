use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// A geocoded place. `city` is the name the caller asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    /// City name as queried
    pub city: String,
    /// Latitude (WGS84)
    pub latitude: f64,
    /// Longitude (WGS84)
    pub longitude: f64,
    /// ISO 3166 country code of the match, when the geocoder reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Pollutant concentrations keyed by OpenWeatherMap component name
/// (`pm2_5`, `pm10`, `o3`, `no2`, `co`, ...), in µg/m³.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PollutantReading(pub BTreeMap<String, f64>);

impl PollutantReading {
    pub fn get(&self, pollutant: &str) -> Option<f64> {
        self.0.get(pollutant).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// US EPA health category for a composite AQI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthyForSensitiveGroups,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Inclusive AQI band. Hazardous is open-ended; its upper bound is the
    /// top of the gauge.
    pub fn band(self) -> (u32, u32) {
        match self {
            AqiCategory::Good => (0, 50),
            AqiCategory::Moderate => (51, 100),
            AqiCategory::UnhealthyForSensitiveGroups => (101, 150),
            AqiCategory::Unhealthy => (151, 200),
            AqiCategory::VeryUnhealthy => (201, 300),
            AqiCategory::Hazardous => (301, 500),
        }
    }
}

/// Composite US AQI with its PM2.5 / PM10 sub-indices.
///
/// `us_aqi` is never below either sub-index.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AqiResult {
    /// Composite US AQI (worse of the two sub-indices)
    pub us_aqi: u32,
    /// PM2.5 sub-index
    pub aqi_pm25: u32,
    /// PM10 sub-index
    pub aqi_pm10: u32,
    /// Health category of `us_aqi`
    pub category: AqiCategory,
    /// Raw concentrations as reported upstream
    pub components: PollutantReading,
}

/// One sampled forecast reading per day.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ForecastDay {
    /// Upstream timestamp text (e.g. "2026-03-01 12:00:00")
    pub date: String,
    /// Air temperature in Celsius
    pub temperature: f64,
    /// Weather description (e.g. "light rain")
    pub description: String,
}

/// Daily forecast, ordered by date.
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
pub struct Forecast {
    #[serde(rename = "forecast")]
    pub days: Vec<ForecastDay>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_boundaries() {
        assert_eq!(AqiCategory::from_aqi(0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(50), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(51), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(100), AqiCategory::Moderate);
        assert_eq!(
            AqiCategory::from_aqi(101),
            AqiCategory::UnhealthyForSensitiveGroups
        );
        assert_eq!(
            AqiCategory::from_aqi(150),
            AqiCategory::UnhealthyForSensitiveGroups
        );
        assert_eq!(AqiCategory::from_aqi(151), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(200), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(201), AqiCategory::VeryUnhealthy);
        assert_eq!(AqiCategory::from_aqi(300), AqiCategory::VeryUnhealthy);
        assert_eq!(AqiCategory::from_aqi(301), AqiCategory::Hazardous);
        assert_eq!(AqiCategory::from_aqi(999), AqiCategory::Hazardous);
    }

    #[test]
    fn test_bands_are_contiguous() {
        for pair in AqiCategory::ALL.windows(2) {
            assert_eq!(pair[0].band().1 + 1, pair[1].band().0);
        }
    }

    #[test]
    fn test_forecast_serializes_under_forecast_key() {
        let forecast = Forecast {
            days: vec![ForecastDay {
                date: "2026-03-01 12:00:00".to_string(),
                temperature: 4.5,
                description: "light snow".to_string(),
            }],
        };
        let json = serde_json::to_value(&forecast).unwrap();
        assert_eq!(json["forecast"][0]["description"], "light snow");
    }

    #[test]
    fn test_pollutant_reading_is_a_flat_map() {
        let reading: PollutantReading =
            serde_json::from_value(serde_json::json!({"pm2_5": 12.5, "pm10": 20.0})).unwrap();
        assert_eq!(reading.get("pm2_5"), Some(12.5));
        assert_eq!(reading.get("o3"), None);
    }
}
