use crate::config::ConfigError;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const USER_AGENT: &str = concat!("city_insight/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client every provider uses. Requests never outlive `timeout`.
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Resolves a dataset reference; absolute references are used as-is.
pub(crate) fn resolve_dataset_path(data_dir: &Path, reference: &Path) -> PathBuf {
    if reference.is_absolute() {
        reference.to_path_buf()
    } else {
        data_dir.join(reference)
    }
}

/// Reads an environment variable, treating blank values as unset.
pub(crate) fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    env_string(key)
        .map(|value| {
            value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            })
        })
        .transpose()
}
