//! Presentation of resolved city conditions.
//!
//! - `render_text_report`: multi-section plain-text report
//! - `build_dashboard`: chart-ready series (AQI gauge + pollutant bars)

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{AqiCategory, AqiResult, Location};
use crate::services::conditions::CityConditions;

/// Upper end of the AQI gauge.
pub const GAUGE_MAX: u32 = 500;

/// Pollutants listed in the text report, as (component key, label, unit).
const REPORT_POLLUTANTS: [(&str, &str, &str); 5] = [
    ("pm2_5", "PM2.5", " µg/m³"),
    ("pm10", "PM10", " µg/m³"),
    ("o3", "O3", ""),
    ("no2", "NO2", ""),
    ("co", "CO", ""),
];

/// One coloured band on the AQI gauge.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GaugeBand {
    pub from: u32,
    pub to: u32,
    pub category: AqiCategory,
    pub label: String,
}

/// AQI gauge scaled to `[min, max]`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GaugeSeries {
    /// Needle position; clamped to `max`
    pub value: u32,
    pub min: u32,
    pub max: u32,
    pub bands: Vec<GaugeBand>,
}

/// A single bar of the pollutant chart.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PollutantBar {
    pub pollutant: String,
    pub value: f64,
}

/// Chart-ready dashboard payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub location: Location,
    pub us_aqi: u32,
    pub category: AqiCategory,
    pub category_label: String,
    pub gauge: GaugeSeries,
    pub pollutants: Vec<PollutantBar>,
    /// When this payload was assembled (ISO 8601)
    pub generated_at: String,
}

pub fn render_text_report(conditions: &CityConditions, generated_at: DateTime<Utc>) -> String {
    let aq = &conditions.air_quality;
    let mut lines = vec![
        "=== AIR QUALITY REPORT ===".to_string(),
        format!("City: {}", conditions.location.city),
        format!("US AQI: {}", aq.us_aqi),
        format!("Category: {}", aq.category.label()),
        String::new(),
        "Main Pollutants:".to_string(),
    ];
    lines.extend(
        REPORT_POLLUTANTS
            .iter()
            .map(|(key, label, unit)| match aq.components.get(key) {
                Some(value) => format!("- {}: {}{}", label, value, unit),
                None => format!("- {}: n/a", label),
            }),
    );
    lines.push(String::new());

    match &conditions.forecast {
        Ok(forecast) => {
            lines.push(format!(
                "=== {}-DAY WEATHER OUTLOOK ===",
                forecast.days.len()
            ));
            lines.extend(forecast.days.iter().map(|day| {
                format!("- {}: {}°C, {}", day.date, day.temperature, day.description)
            }));
        }
        Err(e) => {
            lines.push("=== WEATHER OUTLOOK ===".to_string());
            lines.push(format!("Forecast unavailable: {}", e));
        }
    }

    lines.push(String::new());
    lines.push(format!("Generated at {}", generated_at.to_rfc3339()));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn gauge_series(aq: &AqiResult) -> GaugeSeries {
    GaugeSeries {
        value: aq.us_aqi.min(GAUGE_MAX),
        min: 0,
        max: GAUGE_MAX,
        bands: AqiCategory::ALL
            .iter()
            .map(|&category| {
                let (from, to) = category.band();
                GaugeBand {
                    from,
                    to,
                    category,
                    label: category.label().to_string(),
                }
            })
            .collect(),
    }
}

/// Every upstream component, in component-name order.
pub fn pollutant_bars(aq: &AqiResult) -> Vec<PollutantBar> {
    aq.components
        .iter()
        .map(|(pollutant, value)| PollutantBar {
            pollutant: pollutant.to_string(),
            value,
        })
        .collect()
}

pub fn build_dashboard(
    location: Location,
    aq: &AqiResult,
    generated_at: DateTime<Utc>,
) -> DashboardResponse {
    DashboardResponse {
        location,
        us_aqi: aq.us_aqi,
        category: aq.category,
        category_label: aq.category.label().to_string(),
        gauge: gauge_series(aq),
        pollutants: pollutant_bars(aq),
        generated_at: generated_at.to_rfc3339(),
    }
}
