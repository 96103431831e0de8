use crate::clients::error::ProviderError;
use crate::clients::request::send_json;
use crate::clients::DataSource;
use crate::config::ProviderConfig;
use crate::normalize::weather::normalize_weather;
use crate::types::city_profile::{CityProfile, LatLon};
use crate::types::readings::WeatherReading;
use crate::utils::build_http_client;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

const PROVIDER: &str = "weather";

/// Current-conditions client for an OpenWeatherMap compatible endpoint.
pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_http_client(config.request_timeout).map_err(ProviderError::HttpClient)?,
            base_url: config.openweather_base_url.trim_end_matches('/').to_string(),
            api_key: config.openweather_api_key.clone(),
        })
    }

    /// Fetches the provider's native current-weather payload, in metric units.
    pub async fn fetch_current(&self, location: LatLon) -> Result<Value, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::not_configured(PROVIDER, "OPENWEATHER_API_KEY is not set"))?;
        let url = format!("{}/weather", self.base_url);
        let request = self.http.get(&url).query(&[
            ("lat", location.latitude().to_string()),
            ("lon", location.longitude().to_string()),
            ("appid", api_key.to_string()),
            ("units", "metric".to_string()),
        ]);
        send_json(request, &url).await
    }
}

#[async_trait]
impl DataSource for WeatherClient {
    type Output = WeatherReading;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, city: &CityProfile) -> Result<WeatherReading, ProviderError> {
        let fetched_at = Utc::now();
        let raw = self.fetch_current(city.location).await?;
        Ok(normalize_weather(&raw, fetched_at)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::directory::CityDirectory;
    use crate::test_support::{serve_json, MockRoute};
    use crate::types::field::UnavailableKind;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_normalizes_payload() -> Result<(), Box<dyn std::error::Error>> {
        let base_url = serve_json(vec![MockRoute::ok(
            "/weather",
            json!({
                "main": {"temp": 18.5, "humidity": 60},
                "wind": {"speed": 3.6},
                "weather": [{"description": "clear sky"}],
                "dt": 1_700_000_000
            }),
        )])
        .await?;
        let config = ProviderConfig::builder()
            .openweather_api_key("test-key")
            .openweather_base_url(base_url)
            .build();
        let city = CityDirectory::builtin().resolve("jeju")?.clone();

        let reading = WeatherClient::new(&config)?.fetch(&city).await?;
        assert_eq!(reading.temperature_celsius, Some(18.5));
        assert_eq!(reading.humidity_percent, Some(60));
        assert_eq!(reading.condition.as_deref(), Some("clear sky"));
        assert_eq!(reading.wind_speed_mps, Some(3.6));
        Ok(())
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_unavailable() -> Result<(), Box<dyn std::error::Error>> {
        let base_url = serve_json(vec![MockRoute::status(
            "/weather",
            401,
            json!({"cod": 401, "message": "Invalid API key"}),
        )])
        .await?;
        let config = ProviderConfig::builder()
            .openweather_api_key("wrong-key")
            .openweather_base_url(base_url)
            .build();
        let city = CityDirectory::builtin().resolve("seoul")?.clone();

        let err = WeatherClient::new(&config)?
            .fetch(&city)
            .await
            .err()
            .ok_or("expected an error")?;
        assert!(matches!(err, ProviderError::HttpStatus { status, .. } if status.as_u16() == 401));
        assert_eq!(err.kind(), UnavailableKind::ProviderUnavailable);
        assert!(!err.to_string().contains("wrong-key"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() -> Result<(), Box<dyn std::error::Error>> {
        let client = WeatherClient::new(&ProviderConfig::default())?;
        let result = client.fetch_current(LatLon(33.4996, 126.5312)).await;
        assert!(matches!(result, Err(ProviderError::NotConfigured { .. })));
        Ok(())
    }
}
