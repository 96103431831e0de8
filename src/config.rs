//! Provider configuration, built once at process start and handed to every client.

use crate::utils::{env_parse, env_string};
use bon::Builder;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::num::{NonZeroU32, NonZeroU64};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";
pub const DEFAULT_WORLD_BANK_BASE_URL: &str = "https://api.worldbank.org/v2";
pub const DEFAULT_EARTH_ENGINE_BASE_URL: &str = "https://earthengine.googleapis.com/v1";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_NDVI_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// One economic indicator to include in the composite record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    /// Key used in [`crate::CompositeInsight::indicators`] (e.g. `"population"`).
    pub label: String,
    /// Upstream indicator code (e.g. `"SP.POP.TOTL"`).
    pub code: String,
}

impl IndicatorSpec {
    pub fn new(label: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            code: code.into(),
        }
    }
}

/// Population, GDP per capita (current USD) and unemployment rate.
pub fn default_indicators() -> Vec<IndicatorSpec> {
    vec![
        IndicatorSpec::new("population", "SP.POP.TOTL"),
        IndicatorSpec::new("gdp_per_capita_usd", "NY.GDP.PCAP.CD"),
        IndicatorSpec::new("unemployment_percent", "SL.UEM.TOTL.ZS"),
    ]
}

/// Credentials, endpoints and limits for every upstream provider.
///
/// Secrets default to absent; a client whose secret is missing reports
/// itself unavailable at call time instead of failing construction, so an
/// aggregator can always be built.
///
/// # Examples
///
/// ```
/// use city_insight::ProviderConfig;
/// use std::time::Duration;
///
/// let config = ProviderConfig::builder()
///     .openweather_api_key("test-key")
///     .openweather_base_url("http://127.0.0.1:9000")
///     .request_timeout(Duration::from_secs(2))
///     .build();
/// assert_eq!(config.openweather_api_key.as_deref(), Some("test-key"));
/// assert_eq!(config.ndvi_window_days, 365);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ProviderConfig {
    #[builder(into)]
    pub openweather_api_key: Option<String>,
    #[builder(into, default = DEFAULT_OPENWEATHER_BASE_URL.to_string())]
    pub openweather_base_url: String,

    #[builder(into, default = DEFAULT_WORLD_BANK_BASE_URL.to_string())]
    pub world_bank_base_url: String,
    #[builder(default = default_indicators())]
    pub indicators: Vec<IndicatorSpec>,

    #[builder(into)]
    pub earth_engine_project: Option<String>,
    /// OAuth2 access token sent as a bearer token.
    #[builder(into)]
    pub earth_engine_token: Option<String>,
    #[builder(into, default = DEFAULT_EARTH_ENGINE_BASE_URL.to_string())]
    pub earth_engine_base_url: String,
    #[builder(default = DEFAULT_NDVI_WINDOW_DAYS)]
    pub ndvi_window_days: u32,

    #[builder(into)]
    pub gemini_api_key: Option<String>,
    #[builder(into, default = DEFAULT_GEMINI_MODEL.to_string())]
    pub gemini_model: String,
    #[builder(into, default = DEFAULT_GEMINI_BASE_URL.to_string())]
    pub gemini_base_url: String,

    /// Directory that relative dataset references are resolved against.
    #[builder(into, default = PathBuf::from("."))]
    pub data_dir: PathBuf,
    #[builder(default = Duration::from_secs(DEFAULT_TIMEOUT_SECS))]
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ProviderConfig {
    /// Reads the configuration from the environment, loading a `.env` file first if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable does not parse or is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring unreadable .env file: {}", e),
        }

        let timeout_secs = env_parse::<NonZeroU64>("CITY_INSIGHT_TIMEOUT_SECS")?
            .map_or(DEFAULT_TIMEOUT_SECS, NonZeroU64::get);

        Ok(Self::builder()
            .maybe_openweather_api_key(env_string("OPENWEATHER_API_KEY"))
            .maybe_openweather_base_url(env_string("OPENWEATHER_BASE_URL"))
            .maybe_world_bank_base_url(env_string("WORLD_BANK_BASE_URL"))
            .maybe_earth_engine_project(env_string("EARTH_ENGINE_PROJECT"))
            .maybe_earth_engine_token(env_string("EARTH_ENGINE_TOKEN"))
            .maybe_earth_engine_base_url(env_string("EARTH_ENGINE_BASE_URL"))
            .maybe_ndvi_window_days(env_parse::<NonZeroU32>("CITY_INSIGHT_NDVI_WINDOW_DAYS")?.map(NonZeroU32::get))
            .maybe_gemini_api_key(env_string("GEMINI_API_KEY"))
            .maybe_gemini_model(env_string("GEMINI_MODEL"))
            .maybe_gemini_base_url(env_string("GEMINI_BASE_URL"))
            .maybe_data_dir(env_string("CITY_INSIGHT_DATA_DIR"))
            .request_timeout(Duration::from_secs(timeout_secs))
            .build())
    }
}
