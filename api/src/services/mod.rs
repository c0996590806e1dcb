pub mod aqi;
pub mod conditions;
pub mod openweather;
pub mod report;
