//! Lookup providers feeding the resolver.
//!
//! Both providers sit behind async traits so the resolver can be driven by
//! in-memory implementations in tests.

mod http;
pub mod land;
pub mod ogcio;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::Address;

pub use http::build_client;
pub use land::LandClient;
pub use ogcio::OgcioClient;

/// Fuzzy text lookup. Results come back ranked by the provider's score.
#[async_trait]
pub trait TextLookup: Send + Sync {
    async fn search(&self, address: &str, limit: usize) -> Result<Vec<Address>, ProviderError>;
}

/// Spatial lookup. Results come back ordered by relevance to `address`.
///
/// An empty result means the location has no spatial match; it is not an
/// error.
#[async_trait]
pub trait SpatialLookup: Send + Sync {
    async fn search(&self, address: &str) -> Result<Vec<Address>, ProviderError>;
}
