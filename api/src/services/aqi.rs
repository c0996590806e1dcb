//! US EPA Air Quality Index calculation.
//!
//! Sub-indices are obtained by piecewise-linear interpolation over the EPA
//! breakpoint tables; the composite AQI is the worse (maximum) sub-index.
//! See: https://www.airnow.gov/publications/air-quality-index/technical-assistance-document-for-reporting-the-daily-aqi/
//!
//! Out-of-table concentrations are resolved in `sub_index`:
//! - above the last row: saturates at the top of the scale (500)
//! - in a gap between two rows (e.g. PM2.5 12.05): linear between the rows
//! - negative or non-finite: `AppError::OutOfRange`

use crate::errors::AppError;
use crate::models::{AqiCategory, AqiResult, PollutantReading};

/// One row of a breakpoint table: concentrations `[c_low, c_high]` map
/// linearly onto AQI `[i_low, i_high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub c_low: f64,
    pub c_high: f64,
    pub i_low: f64,
    pub i_high: f64,
}

impl Breakpoint {
    const fn new(c_low: f64, c_high: f64, i_low: f64, i_high: f64) -> Self {
        Self {
            c_low,
            c_high,
            i_low,
            i_high,
        }
    }

    fn contains(&self, concentration: f64) -> bool {
        self.c_low <= concentration && concentration <= self.c_high
    }

    /// Evaluate this row's line at `concentration` (no range check).
    fn eval(&self, concentration: f64) -> f64 {
        self.i_low
            + (self.i_high - self.i_low) / (self.c_high - self.c_low)
                * (concentration - self.c_low)
    }
}

/// PM2.5 (µg/m³, 24-hour) breakpoints.
pub const PM25_BREAKPOINTS: [Breakpoint; 7] = [
    Breakpoint::new(0.0, 12.0, 0.0, 50.0),
    Breakpoint::new(12.1, 35.4, 51.0, 100.0),
    Breakpoint::new(35.5, 55.4, 101.0, 150.0),
    Breakpoint::new(55.5, 150.4, 151.0, 200.0),
    Breakpoint::new(150.5, 250.4, 201.0, 300.0),
    Breakpoint::new(250.5, 350.4, 301.0, 400.0),
    Breakpoint::new(350.5, 500.4, 401.0, 500.0),
];

/// PM10 (µg/m³, 24-hour) breakpoints.
pub const PM10_BREAKPOINTS: [Breakpoint; 7] = [
    Breakpoint::new(0.0, 54.0, 0.0, 50.0),
    Breakpoint::new(55.0, 154.0, 51.0, 100.0),
    Breakpoint::new(155.0, 254.0, 101.0, 150.0),
    Breakpoint::new(255.0, 354.0, 151.0, 200.0),
    Breakpoint::new(355.0, 424.0, 201.0, 300.0),
    Breakpoint::new(425.0, 504.0, 301.0, 400.0),
    Breakpoint::new(505.0, 604.0, 401.0, 500.0),
];

/// Pollutants that contribute to the composite index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pollutant {
    Pm25,
    Pm10,
}

impl Pollutant {
    pub fn breakpoints(self) -> &'static [Breakpoint] {
        match self {
            Pollutant::Pm25 => &PM25_BREAKPOINTS,
            Pollutant::Pm10 => &PM10_BREAKPOINTS,
        }
    }

    /// Key of this pollutant in the OpenWeatherMap `components` object.
    pub fn component_key(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm2_5",
            Pollutant::Pm10 => "pm10",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
        }
    }
}

/// Strict breakpoint interpolation.
///
/// Returns `None` when no row has `c_low <= concentration <= c_high`.
pub fn interpolate(concentration: f64, table: &[Breakpoint]) -> Option<f64> {
    table
        .iter()
        .find(|bp| bp.contains(concentration))
        .map(|bp| bp.eval(concentration))
}

/// Unrounded sub-index for one pollutant, with the out-of-table policy applied.
pub fn sub_index(pollutant: Pollutant, concentration: f64) -> Result<f64, AppError> {
    let table = pollutant.breakpoints();

    if let Some(index) = interpolate(concentration, table) {
        return Ok(index);
    }

    let (first, last) = match (table.first(), table.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(AppError::InternalError(format!(
                "Empty breakpoint table for {}",
                pollutant.display_name()
            )))
        }
    };

    if !concentration.is_finite() || concentration < first.c_low {
        return Err(AppError::OutOfRange(format!(
            "{} concentration {} is outside the AQI breakpoint table",
            pollutant.display_name(),
            concentration
        )));
    }

    if concentration > last.c_high {
        tracing::warn!(
            "{} concentration {} exceeds the AQI scale, reporting {}",
            pollutant.display_name(),
            concentration,
            last.i_high
        );
        return Ok(last.i_high);
    }

    // Gap between two rows: bridge the lower row's top and the upper row's
    // bottom with a straight line.
    table
        .windows(2)
        .find(|pair| pair[0].c_high < concentration && concentration < pair[1].c_low)
        .map(|pair| {
            let (lower, upper) = (&pair[0], &pair[1]);
            lower.i_high
                + (upper.i_low - lower.i_high) / (upper.c_low - lower.c_high)
                    * (concentration - lower.c_high)
        })
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "No breakpoint row covers {} concentration {}",
                pollutant.display_name(),
                concentration
            ))
        })
}

/// PM2.5 sub-index rounded to the nearest integer.
pub fn us_aqi_pm25(concentration: f64) -> Result<u32, AppError> {
    sub_index(Pollutant::Pm25, concentration).map(round_index)
}

/// PM10 sub-index rounded to the nearest integer.
pub fn us_aqi_pm10(concentration: f64) -> Result<u32, AppError> {
    sub_index(Pollutant::Pm10, concentration).map(round_index)
}

fn round_index(index: f64) -> u32 {
    index.round().max(0.0) as u32
}

/// Build the composite result from rounded sub-indices.
///
/// Rounding is monotonic, so the max of the rounded sub-indices equals the
/// rounded max of the raw ones.
pub fn composite(aqi_pm25: u32, aqi_pm10: u32, components: PollutantReading) -> AqiResult {
    let us_aqi = aqi_pm25.max(aqi_pm10);
    AqiResult {
        us_aqi,
        aqi_pm25,
        aqi_pm10,
        category: AqiCategory::from_aqi(us_aqi),
        components,
    }
}

/// Compute the US AQI for an upstream pollutant reading.
///
/// Both PM2.5 and PM10 must be present; a reading without them is treated as
/// unusable upstream data.
pub fn assess(components: PollutantReading) -> Result<AqiResult, AppError> {
    let concentration = |pollutant: Pollutant| {
        components.get(pollutant.component_key()).ok_or_else(|| {
            AppError::UpstreamUnavailable(format!(
                "Air quality data has no {} reading",
                pollutant.display_name()
            ))
        })
    };

    let pm25 = us_aqi_pm25(concentration(Pollutant::Pm25)?)?;
    let pm10 = us_aqi_pm10(concentration(Pollutant::Pm10)?)?;

    Ok(composite(pm25, pm10, components))
}
