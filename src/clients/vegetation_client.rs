use crate::clients::earth_engine::EarthEngineCatalog;
use crate::clients::error::ProviderError;
use crate::clients::DataSource;
use crate::config::ProviderConfig;
use crate::normalize::vegetation::normalize_vegetation;
use crate::types::city_profile::CityProfile;
use crate::types::readings::VegetationIndexSummary;
use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use log::debug;
use serde_json::Value;
use std::sync::Arc;

/// Spatial resolution of the region reduction, in meters.
pub const REDUCTION_SCALE_M: f64 = 250.0;

/// Inclusive date range composites are selected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// The `days` days up to and including `end`.
    pub fn ending_at(end: NaiveDate, days: u32) -> Self {
        let start = end.checked_sub_days(Days::new(days.into())).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }
}

/// Raw outcome of reducing the newest composite over a region.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeReduction {
    /// Band dictionary, e.g. `{"NDVI": 0.48}`. `null` when the window holds no composite.
    pub reduction: Value,
    /// Composite acquisition time in epoch milliseconds, or `null`.
    pub time_start: Value,
}

impl CompositeReduction {
    pub fn empty() -> Self {
        Self {
            reduction: Value::Null,
            time_start: Value::Null,
        }
    }
}

/// A geospatial catalog of administrative boundaries and vegetation-index composites.
#[async_trait]
pub trait VegetationCatalog: Send + Sync {
    /// Whether a boundary feature is registered under `region`.
    async fn boundary_exists(&self, region: &str) -> Result<bool, ProviderError>;

    /// Area-weighted mean of the newest composite in `window` over the boundary of `region`.
    async fn reduce_latest(
        &self,
        region: &str,
        window: DateWindow,
        scale_m: f64,
    ) -> Result<CompositeReduction, ProviderError>;
}

/// Mean NDVI for a city's administrative region.
pub struct VegetationClient {
    catalog: Arc<dyn VegetationCatalog>,
    window_days: u32,
}

impl VegetationClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self::with_catalog(
            Arc::new(EarthEngineCatalog::new(config)?),
            config.ndvi_window_days,
        ))
    }

    pub fn with_catalog(catalog: Arc<dyn VegetationCatalog>, window_days: u32) -> Self {
        Self { catalog, window_days }
    }
}

#[async_trait]
impl DataSource for VegetationClient {
    type Output = VegetationIndexSummary;

    fn name(&self) -> &'static str {
        "vegetation"
    }

    async fn fetch(&self, city: &CityProfile) -> Result<VegetationIndexSummary, ProviderError> {
        let region = city.administrative_name.as_str();
        if !self.catalog.boundary_exists(region).await? {
            return Err(ProviderError::NotFound {
                what: format!("administrative region '{region}'"),
            });
        }

        let window = DateWindow::ending_at(Utc::now().date_naive(), self.window_days);
        debug!("Reducing NDVI for {} between {} and {}", region, window.start, window.end);
        let composite = self
            .catalog
            .reduce_latest(region, window, REDUCTION_SCALE_M)
            .await?;

        Ok(normalize_vegetation(region, &composite.reduction, &composite.time_start)?)
    }
}
