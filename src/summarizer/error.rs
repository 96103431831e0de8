use crate::clients::error::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("Generation request failed")]
    Request(#[from] ProviderError),

    #[error("Model returned no text")]
    EmptyResponse,
}
