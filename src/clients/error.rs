use crate::normalize::error::NormalizeError;
use crate::types::field::UnavailableKind;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode response from {0}")]
    Decode(String, #[source] reqwest::Error),

    #[error("{provider} is not configured: {detail}")]
    NotConfigured {
        provider: &'static str,
        detail: String,
    },

    #[error("Could not find {what}")]
    NotFound { what: String },

    #[error("Dataset '{0}' not found")]
    DatasetMissing(PathBuf),

    #[error("Failed to read dataset '{0}'")]
    DatasetRead(PathBuf, #[source] PolarsError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ProviderError {
    /// Places this error in the field-level taxonomy used by the composite record.
    pub fn kind(&self) -> UnavailableKind {
        match self {
            ProviderError::NotFound { .. } | ProviderError::DatasetMissing(_) => {
                UnavailableKind::NotFound
            }
            ProviderError::Normalize(NormalizeError::NoData { .. }) => UnavailableKind::NoData,
            _ => UnavailableKind::ProviderUnavailable,
        }
    }

    pub(crate) fn not_configured(provider: &'static str, detail: impl Into<String>) -> Self {
        ProviderError::NotConfigured {
            provider,
            detail: detail.into(),
        }
    }
}
