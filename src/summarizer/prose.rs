//! Human-readable rendering of the canonical records.
//!
//! Rounding and digit grouping happen here only; the records themselves keep
//! upstream precision.

use crate::types::field::Field;
use crate::types::readings::{
    AirQualityReading, EconomicIndicator, EnvironmentProfileStats, VegetationIndexSummary,
    WeatherReading,
};
use std::fmt;

const UNKNOWN: &str = "unknown";

fn or_unknown<T>(value: Option<T>, render: impl FnOnce(T) -> String) -> String {
    value.map(render).unwrap_or_else(|| UNKNOWN.to_string())
}

/// Formats `value` with `decimals` fraction digits and comma-grouped thousands.
///
/// ```
/// use city_insight::group_thousands;
///
/// assert_eq!(group_thousands(51_712_619.0, 0), "51,712,619");
/// assert_eq!(group_thousands(-33121.374, 2), "-33,121.37");
/// ```
pub fn group_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3 + 1);
    // Rounding can turn a tiny negative into zero.
    if value.is_sign_negative() && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Label for the 1 to 5 AQI scale.
pub fn aqi_label(aqi: i64) -> &'static str {
    match aqi {
        1 => "good",
        2 => "fair",
        3 => "moderate",
        4 => "poor",
        5 => "very poor",
        _ => "outside the 1-5 scale",
    }
}

impl fmt::Display for WeatherReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "temperature {}, humidity {}, conditions {}, wind {} (observed {})",
            or_unknown(self.temperature_celsius, |t| format!("{t:.1}°C")),
            or_unknown(self.humidity_percent, |h| format!("{h}%")),
            self.condition.as_deref().unwrap_or(UNKNOWN),
            or_unknown(self.wind_speed_mps, |w| format!("{w:.1} m/s")),
            self.observed_at.format("%Y-%m-%d %H:%M UTC"),
        )
    }
}

impl fmt::Display for AirQualityReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ugm3 = |v: f64| format!("{v:.1} μg/m³");
        write!(
            f,
            "AQI {}; PM2.5 {}, PM10 {}, O3 {}, NO2 {}, CO {}",
            or_unknown(self.aqi, |aqi| format!("{aqi} ({})", aqi_label(aqi))),
            or_unknown(self.pm2_5, ugm3),
            or_unknown(self.pm10, ugm3),
            or_unknown(self.o3, ugm3),
            or_unknown(self.no2, ugm3),
            or_unknown(self.co, ugm3),
        )
    }
}

impl fmt::Display for VegetationIndexSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mean_ndvi {
            Some(ndvi) => write!(f, "mean NDVI {ndvi:.3} over {}", self.region_label)?,
            None => write!(
                f,
                "no cloud-free NDVI composite over {} in the queried window",
                self.region_label
            )?,
        }
        if let Some(date) = self.as_of_date {
            write!(f, " (composite of {date})")?;
        }
        Ok(())
    }
}

impl fmt::Display for EnvironmentProfileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "average canopy height {}, average canopy openness {}, urban area {} across {} lidar samples",
            or_unknown(self.avg_canopy_height_m, |h| format!("{h:.1} m")),
            or_unknown(self.avg_canopy_openness_pct, |o| format!("{o:.1}%")),
            or_unknown(self.urban_area_pct, |u| format!("{u:.1}%")),
            group_thousands(self.sample_count as f64, 0),
        )
    }
}

impl fmt::Display for EconomicIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |value: f64| {
            let decimals = if value.fract() == 0.0 { 0 } else { 2 };
            group_thousands(value, decimals)
        };
        match (self.value, self.as_of_year.as_deref()) {
            (Some(value), Some(year)) => write!(f, "{} ({year})", render(value)),
            (Some(value), None) => f.write_str(&render(value)),
            (None, _) => f.write_str("no published value in the queried window"),
        }
    }
}

/// Renders a field as prose, spelling out why it is missing when it is.
pub fn describe<T: fmt::Display>(field: &Field<T>) -> String {
    match field {
        Field::Available { data } => data.to_string(),
        Field::Unavailable { kind, reason } => format!("not available ({kind}: {reason})"),
    }
}
