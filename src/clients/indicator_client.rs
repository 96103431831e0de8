use crate::clients::error::ProviderError;
use crate::clients::request::send_json;
use crate::clients::IndicatorSource;
use crate::config::ProviderConfig;
use crate::normalize::indicator::normalize_indicator;
use crate::types::readings::EconomicIndicator;
use crate::utils::build_http_client;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const PER_PAGE: u32 = 100;

/// Client for a World Bank style indicator API.
///
/// Responses are a two-element envelope: paging metadata, then the entry
/// list (`{"value": .., "date": "2022", ..}`). No key is required.
pub struct IndicatorClient {
    http: Client,
    base_url: String,
}

impl IndicatorClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_http_client(config.request_timeout).map_err(ProviderError::HttpClient)?,
            base_url: config.world_bank_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_series(&self, country_code: &str, indicator_code: &str) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/country/{}/indicator/{}",
            self.base_url, country_code, indicator_code
        );
        let request = self
            .http
            .get(&url)
            .query(&[("format", "json".to_string()), ("per_page", PER_PAGE.to_string())]);
        send_json(request, &url).await
    }
}

#[async_trait]
impl IndicatorSource for IndicatorClient {
    async fn fetch_indicator(
        &self,
        country_code: &str,
        indicator_code: &str,
    ) -> Result<EconomicIndicator, ProviderError> {
        let envelope = self.fetch_series(country_code, indicator_code).await?;
        Ok(normalize_indicator(indicator_code, &envelope)?)
    }
}
