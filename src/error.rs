//! Error types surfaced by the lookup providers and the resolver.

use thiserror::Error;

use crate::proj::ProjError;

/// Failure of a single provider lookup.
///
/// Empty result sets are not errors; they come back as `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider}: request failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider}: HTTP {status} from {url}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("{provider}: malformed response body: {source}")]
    Parse {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider}: invalid endpoint '{endpoint}': {source}")]
    Url {
        provider: &'static str,
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{provider}: cannot reproject record: {source}")]
    Projection {
        provider: &'static str,
        #[source]
        source: ProjError,
    },
}

impl ProviderError {
    /// Name of the provider that failed ("ogcio" or "land").
    pub fn provider(&self) -> &'static str {
        match self {
            ProviderError::Request { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::Parse { provider, .. }
            | ProviderError::Url { provider, .. }
            | ProviderError::Projection { provider, .. } => provider,
        }
    }
}

/// Crate-level error returned by [`crate::Resolver`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A batch worker task panicked or was cancelled.
    #[error("batch worker failed: {0}")]
    Worker(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
