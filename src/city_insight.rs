//! The aggregator: resolves a city, fans out to every data source at once
//! and merges whatever comes back into a single [`CompositeInsight`].

use crate::cities::directory::CityDirectory;
use crate::clients::air_quality_client::AirQualityClient;
use crate::clients::environment_client::EnvironmentClient;
use crate::clients::error::ProviderError;
use crate::clients::indicator_client::IndicatorClient;
use crate::clients::vegetation_client::VegetationClient;
use crate::clients::weather_client::WeatherClient;
use crate::clients::{DataSource, IndicatorSource};
use crate::config::{default_indicators, IndicatorSpec, ProviderConfig};
use crate::error::InsightError;
use crate::summarizer::adapter::{SummaryContext, Summarizer};
use crate::types::city_profile::CityProfile;
use crate::types::composite::CompositeInsight;
use crate::types::field::Field;
use crate::types::readings::{
    AirQualityReading, EconomicIndicator, EnvironmentProfileStats, VegetationIndexSummary,
    WeatherReading,
};
use bon::Builder;
use chrono::Utc;
use futures_util::future::join_all;
use log::{info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Aggregates weather, air quality, vegetation, canopy statistics and
/// economic indicators for a city.
///
/// Create one with [`CityInsight::new`] to talk to the real providers, or
/// with [`CityInsight::builder`] to plug in custom [`DataSource`]s.
///
/// # Examples
///
/// ```rust,no_run
/// # use city_insight::{CityInsight, InsightError, ProviderConfig};
/// # async fn run() -> Result<(), InsightError> {
/// let insight = CityInsight::new(&ProviderConfig::from_env()?)?;
/// let jeju = insight.aggregate("제주").await?;
///
/// println!("{}", jeju.narrative);
/// if let Some(weather) = jeju.weather.data() {
///     println!("Now: {weather}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Builder)]
pub struct CityInsight {
    #[builder(default)]
    directory: CityDirectory,
    weather: Arc<dyn DataSource<Output = WeatherReading>>,
    air_quality: Arc<dyn DataSource<Output = AirQualityReading>>,
    vegetation: Arc<dyn DataSource<Output = VegetationIndexSummary>>,
    environment: Arc<dyn DataSource<Output = EnvironmentProfileStats>>,
    indicator_source: Arc<dyn IndicatorSource>,
    #[builder(default = default_indicators())]
    indicators: Vec<IndicatorSpec>,
    #[builder(default)]
    summarizer: Summarizer,
}

impl CityInsight {
    /// Wires the built-in provider clients from `config`.
    ///
    /// Missing credentials do not fail here; the affected fields report
    /// themselves unavailable when aggregated.
    ///
    /// # Errors
    ///
    /// Fails only if an HTTP client cannot be constructed.
    pub fn new(config: &ProviderConfig) -> Result<Self, InsightError> {
        Ok(Self::builder()
            .weather(Arc::new(WeatherClient::new(config)?))
            .air_quality(Arc::new(AirQualityClient::new(config)?))
            .vegetation(Arc::new(VegetationClient::new(config)?))
            .environment(Arc::new(EnvironmentClient::new(config)))
            .indicator_source(Arc::new(IndicatorClient::new(config)?))
            .indicators(config.indicators.clone())
            .summarizer(Summarizer::from_config(config)?)
            .build())
    }

    pub fn directory(&self) -> &CityDirectory {
        &self.directory
    }

    /// Looks up a city by id or alias.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::CityLookup`] for unknown identifiers.
    pub fn resolve(&self, identifier: &str) -> Result<&CityProfile, InsightError> {
        Ok(self.directory.resolve(identifier)?)
    }

    /// Builds the composite record for `identifier`.
    ///
    /// All sources are queried concurrently. A failing source only degrades
    /// its own field to [`Field::Unavailable`]; the call as a whole fails only
    /// when the city is unknown, in which case no source is contacted.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::CityLookup`] if `identifier` matches no city.
    pub async fn aggregate(&self, identifier: &str) -> Result<CompositeInsight, InsightError> {
        let city = self.resolve(identifier)?;
        info!("Aggregating insight for {}", city.id);

        let (weather, air_quality, vegetation, environment_profile, indicators) = tokio::join!(
            collect(self.weather.as_ref(), city),
            collect(self.air_quality.as_ref(), city),
            collect(self.vegetation.as_ref(), city),
            collect(self.environment.as_ref(), city),
            self.collect_indicators(city),
        );
        let generated_at = Utc::now();

        let narrative = self
            .summarizer
            .summarize(&SummaryContext {
                city_display_name: &city.display_name,
                weather: &weather,
                air_quality: &air_quality,
                vegetation: &vegetation,
                environment_profile: &environment_profile,
                indicators: &indicators,
            })
            .await;

        let insight = CompositeInsight {
            city: city.clone(),
            weather,
            air_quality,
            vegetation,
            environment_profile,
            indicators,
            narrative,
            generated_at,
        };
        info!(
            "Aggregated {} with {} available fields",
            insight.city.id,
            insight.available_count()
        );
        Ok(insight)
    }

    pub async fn weather(&self, identifier: &str) -> Result<WeatherReading, InsightError> {
        Ok(self.weather.fetch(self.resolve(identifier)?).await?)
    }

    pub async fn air_quality(&self, identifier: &str) -> Result<AirQualityReading, InsightError> {
        Ok(self.air_quality.fetch(self.resolve(identifier)?).await?)
    }

    pub async fn vegetation(&self, identifier: &str) -> Result<VegetationIndexSummary, InsightError> {
        Ok(self.vegetation.fetch(self.resolve(identifier)?).await?)
    }

    pub async fn environment_profile(&self, identifier: &str) -> Result<EnvironmentProfileStats, InsightError> {
        Ok(self.environment.fetch(self.resolve(identifier)?).await?)
    }

    /// Every configured indicator for the city's country, each degrading on its own.
    pub async fn indicators(
        &self,
        identifier: &str,
    ) -> Result<BTreeMap<String, Field<EconomicIndicator>>, InsightError> {
        let city = self.resolve(identifier)?;
        Ok(self.collect_indicators(city).await)
    }

    async fn collect_indicators(&self, city: &CityProfile) -> BTreeMap<String, Field<EconomicIndicator>> {
        let fetches = self.indicators.iter().map(|spec| async move {
            let result = self
                .indicator_source
                .fetch_indicator(&city.country_code, &spec.code)
                .await;
            (spec.label.clone(), field_or_warn(&spec.label, city, result))
        });
        join_all(fetches).await.into_iter().collect()
    }
}

async fn collect<T: Send>(source: &dyn DataSource<Output = T>, city: &CityProfile) -> Field<T> {
    field_or_warn(source.name(), city, source.fetch(city).await)
}

fn field_or_warn<T>(source_name: &str, city: &CityProfile, result: Result<T, ProviderError>) -> Field<T> {
    if let Err(e) = &result {
        warn!("{} unavailable for {}: {}", source_name, city.id, e);
    }
    Field::from_result(result)
}
