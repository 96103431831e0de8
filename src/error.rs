use crate::cities::error::CityLookupError;
use crate::clients::error::ProviderError;
use crate::config::ConfigError;
use crate::summarizer::error::GenerationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error(transparent)]
    CityLookup(#[from] CityLookupError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
