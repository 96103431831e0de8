use crate::normalize::error::NormalizeError;
use crate::normalize::json::{get_opt_f64, get_opt_i64, get_opt_string, get_opt_timestamp};
use crate::types::readings::WeatherReading;
use chrono::{DateTime, Utc};
use serde_json::Value;

const SOURCE_NAME: &str = "weather";

/// Maps a current-weather payload (`main`, `wind`, `weather[0]`, `dt`) onto a [`WeatherReading`].
///
/// Missing keys leave the matching field empty. `fetched_at` stands in for
/// `observed_at` when the payload carries no `dt`.
pub fn normalize_weather(
    raw: &Value,
    fetched_at: DateTime<Utc>,
) -> Result<WeatherReading, NormalizeError> {
    if !raw.is_object() {
        return Err(NormalizeError::malformed(
            SOURCE_NAME,
            "expected a JSON object",
        ));
    }

    Ok(WeatherReading {
        temperature_celsius: get_opt_f64(raw, "/main/temp"),
        humidity_percent: get_opt_i64(raw, "/main/humidity"),
        condition: get_opt_string(raw, "/weather/0/description"),
        wind_speed_mps: get_opt_f64(raw, "/wind/speed"),
        observed_at: get_opt_timestamp(raw, "/dt").unwrap_or(fetched_at),
    })
}
