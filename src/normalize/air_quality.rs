use crate::normalize::error::NormalizeError;
use crate::normalize::json::{get_opt_f64, get_opt_i64, get_opt_timestamp};
use crate::types::readings::AirQualityReading;
use chrono::{DateTime, Utc};
use serde_json::Value;

const SOURCE_NAME: &str = "air_quality";

/// Maps an air-pollution payload onto an [`AirQualityReading`].
///
/// Only the first entry of `list` is used. An absent or empty `list` is
/// [`NormalizeError::NoData`].
pub fn normalize_air_quality(
    raw: &Value,
    fetched_at: DateTime<Utc>,
) -> Result<AirQualityReading, NormalizeError> {
    let entry = raw
        .get("list")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .ok_or_else(|| NormalizeError::no_data(SOURCE_NAME))?;

    Ok(AirQualityReading {
        aqi: get_opt_i64(entry, "/main/aqi"),
        co: get_opt_f64(entry, "/components/co"),
        no2: get_opt_f64(entry, "/components/no2"),
        o3: get_opt_f64(entry, "/components/o3"),
        pm2_5: get_opt_f64(entry, "/components/pm2_5"),
        pm10: get_opt_f64(entry, "/components/pm10"),
        observed_at: get_opt_timestamp(entry, "/dt").unwrap_or(fetched_at),
    })
}
