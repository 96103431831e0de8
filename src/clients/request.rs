use crate::clients::error::ProviderError;
use log::{info, warn};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Sends a request and decodes its JSON body into `T`.
///
/// `url` is only used for logs and error messages and must not carry
/// credentials; URLs are also stripped from the underlying reqwest errors.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    url: &str,
) -> Result<T, ProviderError> {
    let response = send_checked(request, url).await?;

    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::Decode(url.to_string(), e.without_url()))
}

/// Sends a request and rejects non-success statuses.
pub(crate) async fn send_checked(request: RequestBuilder, url: &str) -> Result<Response, ProviderError> {
    info!("Requesting {}", url);

    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::NetworkRequest(url.to_string(), e.without_url()))?;

    check_status(response, url)
}

fn check_status(response: Response, url: &str) -> Result<Response, ProviderError> {
    match response.error_for_status() {
        Ok(resp) => Ok(resp),
        Err(e) => {
            warn!("HTTP error for {}: {}", url, e.status().map(|s| s.to_string()).unwrap_or_default());
            Err(match e.status() {
                Some(status) => ProviderError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source: e.without_url(),
                },
                None => ProviderError::NetworkRequest(url.to_string(), e.without_url()),
            })
        }
    }
}
