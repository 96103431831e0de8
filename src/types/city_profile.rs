//! Defines the static description of a city: where it is, how each upstream
//! provider names it, and which precomputed dataset belongs to it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use city_insight::LatLon;
///
/// let jeju = LatLon(33.4996, 126.5312);
/// assert_eq!(jeju.0, 33.4996); // Latitude
/// assert_eq!(jeju.1, 126.5312); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

/// Immutable metadata for a single city, looked up through [`crate::CityDirectory`].
///
/// A profile carries everything the provider clients need to query their
/// upstream for this city, so no client ever has to know about other cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityProfile {
    /// Canonical identifier (e.g. `"jeju"`).
    pub id: String,
    /// Human readable name used in narratives (e.g. `"Jeju"`).
    pub display_name: String,
    /// Center point used by the weather and air-quality providers.
    pub location: LatLon,
    /// Region label as spelled in the administrative-boundary catalog (e.g. `"Cheju-do"`).
    pub administrative_name: String,
    /// ISO3 country code used for economic indicators (e.g. `"KOR"`).
    pub country_code: String,
    /// Path of the precomputed canopy dataset, relative to the configured data directory.
    pub dataset_reference: PathBuf,
    /// Alternative spellings that resolve to this profile.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl CityProfile {
    /// Returns the id followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}
