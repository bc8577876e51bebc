//! OGCIO Address Lookup Service adapter.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use tracing::{debug, warn};

use super::http::{build_client, endpoint_url, fetch_json};
use super::TextLookup;
use crate::config::{HttpConfig, OgcioConfig};
use crate::error::ProviderError;
use crate::models::{Address, GeoPoint, Language, OgcioRecord, OgcioResponse};
use crate::proj::grid_to_wgs84_rounded;

pub const PROVIDER: &str = "ogcio";

/// Text-similarity lookup against the OGCIO ALS `lookup` endpoint
#[derive(Clone)]
pub struct OgcioClient {
    client: Client,
    endpoint: String,
}

impl OgcioClient {
    pub fn new(config: &OgcioConfig, http: &HttpConfig) -> Result<Self, ProviderError> {
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
impl TextLookup for OgcioClient {
    async fn search(&self, address: &str, limit: usize) -> Result<Vec<Address>, ProviderError> {
        let limit = limit.to_string();
        let url = endpoint_url(PROVIDER, &self.endpoint, &[("q", address), ("n", &limit)])?;

        let request = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, "en,zh-Hant");

        let response: OgcioResponse = fetch_json(PROVIDER, &url, request).await?;
        let addresses = into_addresses(response);

        debug!("ogcio returned {} records for '{}'", addresses.len(), address);
        Ok(addresses)
    }
}

/// Turn a parsed response into addresses, best score first.
pub fn into_addresses(response: OgcioResponse) -> Vec<Address> {
    let mut records: Vec<OgcioRecord> = response
        .suggested_address
        .into_iter()
        .map(OgcioRecord::from)
        .collect();
    records.sort_by(|a, b| b.score.total_cmp(&a.score));

    records
        .into_iter()
        .filter_map(|record| match coordinate_of(&record) {
            Some(point) => Some(Address::from_ogcio(record, point)),
            None => {
                warn!(
                    "Dropping ogcio record without usable coordinates: {}",
                    record.full_address(Language::English)
                );
                None
            }
        })
        .collect()
}

/// WGS84 position of a record, falling back to its HK1980 grid position.
fn coordinate_of(record: &OgcioRecord) -> Option<GeoPoint> {
    let geo = record.geospatial()?;

    if let (Some(lat), Some(lon)) = (geo.latitude, geo.longitude) {
        return Some(GeoPoint::new(lon, lat));
    }

    let (easting, northing) = (geo.easting?, geo.northing?);
    grid_to_wgs84_rounded(easting, northing)
        .ok()
        .map(|c| GeoPoint::new(c.x, c.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::http::parse_body;

    const RESPONSE: &str = r#"{
        "SuggestedAddress": [
            {
                "Address": {"PremisesAddress": {
                    "EngPremisesAddress": {"BuildingName": "LOWER"},
                    "GeospatialInformation": {"Latitude": "22.2800", "Longitude": "114.1600"}
                }},
                "ValidationInformation": {"Score": 40.0}
            },
            {
                "Address": {"PremisesAddress": {
                    "EngPremisesAddress": {"BuildingName": "GRID ONLY"},
                    "GeospatialInformation": {"Northing": "815633", "Easting": "835349"}
                }},
                "ValidationInformation": {"Score": 60.0}
            },
            {
                "Address": {"PremisesAddress": {
                    "EngPremisesAddress": {"BuildingName": "NO POSITION"}
                }},
                "ValidationInformation": {"Score": 99.0}
            },
            {
                "Address": {"PremisesAddress": {
                    "EngPremisesAddress": {"BuildingName": "HIGHER"},
                    "GeospatialInformation": {"Latitude": 22.3, "Longitude": 114.17}
                }},
                "ValidationInformation": {"Score": 90.5}
            }
        ]
    }"#;

    #[test]
    fn test_records_sorted_by_score() {
        let response: OgcioResponse = parse_body(PROVIDER, RESPONSE.as_bytes()).unwrap();
        let addresses = into_addresses(response);

        let names: Vec<_> = addresses
            .iter()
            .map(|a| a.name(Language::English).unwrap())
            .collect();
        assert_eq!(names, vec!["HIGHER", "GRID ONLY", "LOWER"]);
        assert_eq!(addresses[0].score(), Some(90.5));
    }

    #[test]
    fn test_grid_fallback_coordinate() {
        let response: OgcioResponse = parse_body(PROVIDER, RESPONSE.as_bytes()).unwrap();
        let addresses = into_addresses(response);

        let grid_only = &addresses[1];
        assert_eq!(grid_only.coordinate(), GeoPoint::new(114.168, 22.2796));
    }

    #[test]
    fn test_empty_response() {
        let response: OgcioResponse = parse_body(PROVIDER, b"{}").unwrap();
        assert!(into_addresses(response).is_empty());
    }

    #[test]
    fn test_malformed_response() {
        let err = parse_body::<OgcioResponse>(PROVIDER, b"{\"SuggestedAddress\": 7}").unwrap_err();
        assert!(matches!(err, ProviderError::Parse { provider: "ogcio", .. }));
    }
}
