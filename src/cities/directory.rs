use crate::cities::error::CityLookupError;
use crate::types::city_profile::{CityProfile, LatLon};
use std::collections::HashMap;
use std::path::PathBuf;

/// Registry of supported cities, resolvable by id or any alias.
///
/// Lookups trim surrounding whitespace and ignore case, so `" JEJU "`,
/// `"jeju-si"` and `"제주"` all resolve to the same profile.
///
/// # Examples
///
/// ```
/// use city_insight::CityDirectory;
///
/// let directory = CityDirectory::builtin();
/// let jeju = directory.resolve("제주").unwrap();
/// assert_eq!(jeju.administrative_name, "Cheju-do");
/// assert!(directory.resolve("atlantis").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CityDirectory {
    profiles: Vec<CityProfile>,
    index: HashMap<String, usize>,
}

impl CityDirectory {
    /// Builds a directory from `profiles`. When two profiles claim the same
    /// name, the first one wins.
    pub fn new(profiles: Vec<CityProfile>) -> Self {
        let mut index = HashMap::new();
        for (position, profile) in profiles.iter().enumerate() {
            for name in profile.names() {
                index.entry(lookup_key(name)).or_insert(position);
            }
        }
        Self { profiles, index }
    }

    /// The Korean cities served out of the box.
    pub fn builtin() -> Self {
        Self::new(vec![
            profile(
                "jeju",
                "Jeju",
                LatLon(33.4996, 126.5312),
                "Cheju-do",
                &["Jeju", "제주", "jeju-si"],
            ),
            profile("seoul", "Seoul", LatLon(37.5665, 126.9780), "Seoul", &["서울"]),
            profile("busan", "Busan", LatLon(35.1796, 129.0756), "Pusan", &["부산"]),
            profile("daegu", "Daegu", LatLon(35.8714, 128.6014), "Taegu", &["대구"]),
            profile("daejeon", "Daejeon", LatLon(36.3504, 127.3845), "Taejon", &["대전"]),
        ])
    }

    pub fn resolve(&self, identifier: &str) -> Result<&CityProfile, CityLookupError> {
        self.index
            .get(&lookup_key(identifier))
            .and_then(|&position| self.profiles.get(position))
            .ok_or_else(|| CityLookupError::UnknownCity(identifier.trim().to_string()))
    }

    pub fn cities(&self) -> &[CityProfile] {
        &self.profiles
    }
}

impl Default for CityDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

fn lookup_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn profile(id: &str, display_name: &str, location: LatLon, administrative_name: &str, aliases: &[&str]) -> CityProfile {
    CityProfile {
        id: id.to_string(),
        display_name: display_name.to_string(),
        location,
        administrative_name: administrative_name.to_string(),
        country_code: "KOR".to_string(),
        dataset_reference: PathBuf::from(format!("{id}_atl08_analysis.csv")),
        aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
    }
}
