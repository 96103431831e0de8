//! Canonical per-domain records produced by the normalizers.
//!
//! Every numeric field keeps full upstream precision; rounding happens only
//! when a record is rendered into prose.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions at a city's center point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_celsius: Option<f64>,
    pub humidity_percent: Option<i64>,
    pub condition: Option<String>,
    pub wind_speed_mps: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

/// Current pollutant breakdown plus the discrete AQI category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    /// 1 (good) to 5 (very poor).
    pub aqi: Option<i64>,
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

/// Area-weighted mean NDVI over a region for the most recent composite.
///
/// `mean_ndvi` is `None` when the composite had no usable pixels over the
/// region; that is a normal outcome, not a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationIndexSummary {
    pub mean_ndvi: Option<f64>,
    pub as_of_date: Option<NaiveDate>,
    pub region_label: String,
}

/// Latest published value of one economic indicator.
///
/// `value` is `None` when no entry in the queried window carried a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicIndicator {
    pub code: String,
    pub value: Option<f64>,
    pub as_of_year: Option<String>,
}

/// Aggregates over the valid subset (canopy height in `[0, 100)`) of a city's canopy dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentProfileStats {
    /// `None` when no remaining row carries the value.
    pub avg_canopy_height_m: Option<f64>,
    pub avg_canopy_openness_pct: Option<f64>,
    pub urban_area_pct: Option<f64>,
    /// Number of observations that passed the validity filter.
    pub sample_count: u64,
}
