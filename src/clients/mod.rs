//! Provider clients: one per upstream data source.
//!
//! Each client performs a single outbound query and hands the raw payload to
//! its normalizer. The aggregator only sees the [`DataSource`] and
//! [`IndicatorSource`] seams, so sources can be added or faked without
//! touching it.

pub mod air_quality_client;
pub mod earth_engine;
pub mod environment_client;
pub mod error;
pub mod indicator_client;
pub(crate) mod request;
pub mod vegetation_client;
pub mod weather_client;

use crate::clients::error::ProviderError;
use crate::types::city_profile::CityProfile;
use crate::types::readings::EconomicIndicator;
use async_trait::async_trait;

/// A source that produces one normalized record per city.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Output: Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn fetch(&self, city: &CityProfile) -> Result<Self::Output, ProviderError>;
}

/// A source of country-level economic time series.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    async fn fetch_indicator(
        &self,
        country_code: &str,
        indicator_code: &str,
    ) -> Result<EconomicIndicator, ProviderError>;
}
