use crate::clients::error::ProviderError;
use crate::clients::request::send_json;
use crate::clients::DataSource;
use crate::config::ProviderConfig;
use crate::normalize::air_quality::normalize_air_quality;
use crate::types::city_profile::{CityProfile, LatLon};
use crate::types::readings::AirQualityReading;
use crate::utils::build_http_client;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

const PROVIDER: &str = "air_quality";

/// Air-pollution client for an OpenWeatherMap compatible endpoint.
pub struct AirQualityClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AirQualityClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_http_client(config.request_timeout).map_err(ProviderError::HttpClient)?,
            base_url: config.openweather_base_url.trim_end_matches('/').to_string(),
            api_key: config.openweather_api_key.clone(),
        })
    }

    /// Fetches the native payload: a `list` of entries with `main.aqi` and `components`.
    pub async fn fetch_current(&self, location: LatLon) -> Result<Value, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::not_configured(PROVIDER, "OPENWEATHER_API_KEY is not set"))?;
        let url = format!("{}/air_pollution", self.base_url);
        let request = self.http.get(&url).query(&[
            ("lat", location.latitude().to_string()),
            ("lon", location.longitude().to_string()),
            ("appid", api_key.to_string()),
        ]);
        send_json(request, &url).await
    }
}

#[async_trait]
impl DataSource for AirQualityClient {
    type Output = AirQualityReading;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch(&self, city: &CityProfile) -> Result<AirQualityReading, ProviderError> {
        let fetched_at = Utc::now();
        let raw = self.fetch_current(city.location).await?;
        Ok(normalize_air_quality(&raw, fetched_at)?)
    }
}
