use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("{source_name} returned no data")]
    NoData { source_name: String },

    #[error("Unexpected {source_name} payload: {detail}")]
    Malformed { source_name: String, detail: String },

    // Missing columns surface here as well, polars reports them on collect
    #[error("Failed aggregating tabular dataset")]
    Frame(#[from] PolarsError),
}

impl NormalizeError {
    pub(crate) fn no_data(source_name: &str) -> Self {
        NormalizeError::NoData {
            source_name: source_name.to_string(),
        }
    }

    pub(crate) fn malformed(source_name: &str, detail: impl Into<String>) -> Self {
        NormalizeError::Malformed {
            source_name: source_name.to_string(),
            detail: detail.into(),
        }
    }
}
