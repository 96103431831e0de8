mod cities;
mod city_insight;
mod clients;
mod config;
mod error;
mod normalize;
mod server;
mod summarizer;
#[cfg(test)]
mod test_support;
mod types;
mod utils;

pub use city_insight::CityInsight;
pub use error::InsightError;

pub use cities::directory::CityDirectory;
pub use cities::error::CityLookupError;

pub use config::{default_indicators, ConfigError, IndicatorSpec, ProviderConfig};
pub use config::{
    DEFAULT_EARTH_ENGINE_BASE_URL, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
    DEFAULT_NDVI_WINDOW_DAYS, DEFAULT_OPENWEATHER_BASE_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_WORLD_BANK_BASE_URL,
};

pub use clients::air_quality_client::AirQualityClient;
pub use clients::earth_engine::EarthEngineCatalog;
pub use clients::environment_client::EnvironmentClient;
pub use clients::error::ProviderError;
pub use clients::indicator_client::IndicatorClient;
pub use clients::vegetation_client::*;
pub use clients::weather_client::WeatherClient;
pub use clients::{DataSource, IndicatorSource};

pub use normalize::air_quality::normalize_air_quality;
pub use normalize::environment::*;
pub use normalize::error::NormalizeError;
pub use normalize::indicator::{normalize_indicator, normalize_indicator_series};
pub use normalize::vegetation::normalize_vegetation;
pub use normalize::weather::normalize_weather;

pub use summarizer::adapter::*;
pub use summarizer::error::GenerationError;
pub use summarizer::generator::{GeminiGenerator, TextGenerator};
pub use summarizer::prose::{aqi_label, describe, group_thousands};

pub use types::city_profile::{CityProfile, LatLon};
pub use types::composite::CompositeInsight;
pub use types::field::{Field, UnavailableKind};
pub use types::readings::*;

pub use server::{create_router, run_server, AppState};
