//! Lands Department location search adapter.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::http::{build_client, endpoint_url, fetch_json};
use super::SpatialLookup;
use crate::config::{HttpConfig, LandConfig};
use crate::error::ProviderError;
use crate::land_sorter::sort_land_results;
use crate::models::{Address, GeoPoint, LandRecord};
use crate::proj::grid_to_wgs84_rounded;

pub const PROVIDER: &str = "land";

/// Spatial lookup against the geodata.gov.hk `locationSearch` endpoint
#[derive(Clone)]
pub struct LandClient {
    client: Client,
    endpoint: String,
}

impl LandClient {
    pub fn new(config: &LandConfig, http: &HttpConfig) -> Result<Self, ProviderError> {
        Ok(Self::with_client(
            build_client(PROVIDER, http)?,
            &config.endpoint,
        ))
    }

    pub fn with_client(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl SpatialLookup for LandClient {
    async fn search(&self, address: &str) -> Result<Vec<Address>, ProviderError> {
        let url = endpoint_url(PROVIDER, &self.endpoint, &[("q", address)])?;
        let request = self.client.get(url.clone());

        let records: Vec<LandRecord> = fetch_json(PROVIDER, &url, request).await?;
        let addresses = sort_land_results(address, into_addresses(records)?);

        debug!("land returned {} records for '{}'", addresses.len(), address);
        Ok(addresses)
    }
}

/// Reproject each record to WGS84 (rounded to 4 dp) and wrap it.
///
/// A record that cannot be reprojected fails the whole response.
pub fn into_addresses(records: Vec<LandRecord>) -> Result<Vec<Address>, ProviderError> {
    records
        .into_iter()
        .map(|record| {
            let c = grid_to_wgs84_rounded(record.x, record.y).map_err(|source| {
                ProviderError::Projection {
                    provider: PROVIDER,
                    source,
                }
            })?;
            Ok(Address::from_land(record, GeoPoint::new(c.x, c.y)))
        })
        .collect()
}
