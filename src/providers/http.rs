//! Shared HTTP plumbing for the provider adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::HttpConfig;
use crate::error::ProviderError;

/// Build the reqwest client used by a provider.
///
/// gzip is negotiated by reqwest itself; setting `Accept-Encoding` by hand
/// would turn off transparent decompression.
pub fn build_client(provider: &'static str, config: &HttpConfig) -> Result<Client, ProviderError> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .build()
        .map_err(|source| ProviderError::Request { provider, source })
}

/// Endpoint URL with query parameters appended.
pub fn endpoint_url(
    provider: &'static str,
    endpoint: &str,
    params: &[(&str, &str)],
) -> Result<Url, ProviderError> {
    Url::parse_with_params(endpoint, params).map_err(|source| ProviderError::Url {
        provider,
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Send `request` and parse the JSON body into `T`.
pub async fn fetch_json<T: DeserializeOwned>(
    provider: &'static str,
    url: &Url,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    debug!("{} request: {}", provider, url);

    let response = request
        .send()
        .await
        .map_err(|source| ProviderError::Request { provider, source })?;

    if !response.status().is_success() {
        return Err(ProviderError::Status {
            provider,
            status: response.status(),
            url: url.to_string(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| ProviderError::Request { provider, source })?;

    parse_body(provider, &body)
}

/// Parse a response body, mapping schema mismatches to [`ProviderError::Parse`].
pub fn parse_body<T: DeserializeOwned>(provider: &'static str, body: &[u8]) -> Result<T, ProviderError> {
    serde_json::from_slice(body).map_err(|source| ProviderError::Parse { provider, source })
}
