//! In-memory providers and address builders for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::ogcio::{ChiPremisesAddress, EngPremisesAddress, GeospatialInformation, PremisesAddress};
use crate::models::{Address, GeoPoint, LandRecord, OgcioRecord};
use crate::providers::{SpatialLookup, TextLookup};

/// OGCIO address named `name` in both languages, at (lon, lat).
pub fn ogcio_at(name: &str, lon: f64, lat: f64, score: f64) -> Address {
    let record = OgcioRecord {
        score,
        premises: PremisesAddress {
            eng_premises_address: Some(EngPremisesAddress {
                building_name: Some(name.to_string()),
                ..Default::default()
            }),
            chi_premises_address: Some(ChiPremisesAddress {
                building_name: Some(name.to_string()),
                ..Default::default()
            }),
            geospatial_information: Some(GeospatialInformation {
                latitude: Some(lat),
                longitude: Some(lon),
                ..Default::default()
            }),
            geo_address: None,
        },
    };
    Address::from_ogcio(record, GeoPoint::new(lon, lat))
}

/// Land address with an English name and no Chinese address.
pub fn land_at(name: &str, lon: f64, lat: f64) -> Address {
    land_at_with_zh(name, lon, lat, "")
}

pub fn land_at_with_zh(name: &str, lon: f64, lat: f64, address_zh: &str) -> Address {
    let record = LandRecord {
        name_en: name.to_string(),
        address_zh: address_zh.to_string(),
        ..Default::default()
    };
    Address::from_land(record, GeoPoint::new(lon, lat))
}

/// Land address with the given text fields, position irrelevant.
pub fn land_record(name_en: &str, name_zh: &str, address_en: &str, address_zh: &str) -> Address {
    let record = LandRecord {
        name_en: name_en.to_string(),
        name_zh: name_zh.to_string(),
        address_en: address_en.to_string(),
        address_zh: address_zh.to_string(),
        ..Default::default()
    };
    Address::from_land(record, GeoPoint::new(114.17, 22.3))
}

fn injected_failure(provider: &'static str) -> ProviderError {
    let source = serde_json::from_str::<u8>("not json").unwrap_err();
    ProviderError::Parse { provider, source }
}

/// Canned responses keyed by query. Unknown queries return no results.
#[derive(Default)]
struct Canned {
    responses: HashMap<String, Vec<Address>>,
    failures: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, Option<usize>)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed: AtomicUsize,
}

impl Canned {
    async fn answer(
        &self,
        provider: &'static str,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Address>, ProviderError> {
        self.calls.lock().unwrap().push((query.to_string(), limit));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);

        if self.failures.contains(query) {
            return Err(injected_failure(provider));
        }
        Ok(self.responses.get(query).cloned().unwrap_or_default())
    }
}

macro_rules! fake_provider {
    ($name:ident) => {
        #[derive(Default)]
        pub struct $name {
            canned: Canned,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn respond(mut self, query: &str, results: Vec<Address>) -> Self {
                self.canned.responses.insert(query.to_string(), results);
                self
            }

            pub fn fail(mut self, query: &str) -> Self {
                self.canned.failures.insert(query.to_string());
                self
            }

            pub fn delay(mut self, query: &str, delay: Duration) -> Self {
                self.canned.delays.insert(query.to_string(), delay);
                self
            }

            /// Queries received, in arrival order
            pub fn calls(&self) -> Vec<String> {
                self.canned
                    .calls
                    .lock()
                    .unwrap()
                    .iter()
                    .map(|(q, _)| q.clone())
                    .collect()
            }

            pub fn limits(&self) -> Vec<usize> {
                self.canned
                    .calls
                    .lock()
                    .unwrap()
                    .iter()
                    .filter_map(|(_, l)| *l)
                    .collect()
            }

            pub fn max_in_flight(&self) -> usize {
                self.canned.max_in_flight.load(Ordering::SeqCst)
            }

            /// Lookups that ran to completion (not cancelled mid-delay)
            pub fn completed(&self) -> usize {
                self.canned.completed.load(Ordering::SeqCst)
            }
        }
    };
}

fake_provider!(FakeText);
fake_provider!(FakeSpatial);

#[async_trait]
impl TextLookup for FakeText {
    async fn search(&self, address: &str, limit: usize) -> Result<Vec<Address>, ProviderError> {
        self.canned.answer("ogcio", address, Some(limit)).await
    }
}

#[async_trait]
impl SpatialLookup for FakeSpatial {
    async fn search(&self, address: &str) -> Result<Vec<Address>, ProviderError> {
        self.canned.answer("land", address, None).await
    }
}
