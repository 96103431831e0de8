//! The merged, multi-source record returned for a single city query.

use crate::types::city_profile::CityProfile;
use crate::types::field::Field;
use crate::types::readings::{
    AirQualityReading, EconomicIndicator, EnvironmentProfileStats, VegetationIndexSummary,
    WeatherReading,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything known about a city at one moment.
///
/// Assembled once per [`crate::CityInsight::aggregate`] call and never cached.
/// Each data field degrades on its own; `generated_at` is stamped once for
/// the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeInsight {
    pub city: CityProfile,
    pub weather: Field<WeatherReading>,
    pub air_quality: Field<AirQualityReading>,
    pub vegetation: Field<VegetationIndexSummary>,
    pub environment_profile: Field<EnvironmentProfileStats>,
    /// Keyed by indicator label (e.g. `"population"`).
    pub indicators: BTreeMap<String, Field<EconomicIndicator>>,
    pub narrative: String,
    pub generated_at: DateTime<Utc>,
}

impl CompositeInsight {
    /// Number of data fields (indicators included) that hold a value.
    pub fn available_count(&self) -> usize {
        [
            self.weather.is_available(),
            self.air_quality.is_available(),
            self.vegetation.is_available(),
            self.environment_profile.is_available(),
        ]
        .into_iter()
        .chain(self.indicators.values().map(Field::is_available))
        .filter(|available| *available)
        .count()
    }
}
