//! Address resolution: reconcile OGCIO text matches with Lands Department
//! spatial matches into a single ranking.
//!
//! The two providers disagree often. OGCIO ranks by text similarity and
//! happily returns a well-scored premises on the wrong street; the location
//! search knows where things are but only at building granularity. The
//! resolver treats agreement between them as confirmation and otherwise
//! trusts the location search's top hit as ground truth:
//!
//! 1. No land results: the OGCIO ranking stands.
//! 2. OGCIO's top result lies near *any* land result: the OGCIO ranking stands.
//! 3. Some OGCIO results lie near the top land result: those, closest first.
//! 4. Search OGCIO again with the top land result's Chinese address; keep the
//!    new ranking if its top result lies near the land result.
//! 5. Otherwise the land ranking is the answer.

pub mod batch;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::{Config, DEFAULT_OGCIO_LIMIT};
use crate::error::{ProviderError, Result};
use crate::models::{Address, Language};
use crate::providers::{LandClient, OgcioClient, SpatialLookup, TextLookup};

pub use batch::{resolve_many, BatchOptions};

/// Two records closer than this (in km, i.e. 50 m) are the same place.
///
/// Calibrated against land coordinates rounded to 4 decimal places.
pub const NEAR_THRESHOLD_KM: f64 = 0.05;

/// Which reconciliation rule produced a [`Resolution`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Land search found nothing; OGCIO ranking returned as is
    TextOnly,
    /// OGCIO's top result matched a land result
    Agreement,
    /// OGCIO results near the top land result, closest first
    NearestToLand,
    /// OGCIO re-searched with the top land result's address
    Requery,
    /// Land ranking returned as is
    LandFallback,
}

/// An address in a resolution, paired with its distance to the top land
/// result when that distance decided the ranking.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub address: Address,
    /// Kilometres to the top land result; only set for [`Strategy::NearestToLand`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub strategy: Strategy,
    pub candidates: Vec<Candidate>,
}

impl Resolution {
    fn ranked(strategy: Strategy, addresses: Vec<Address>) -> Self {
        Self {
            strategy,
            candidates: addresses
                .into_iter()
                .map(|address| Candidate {
                    address,
                    distance: None,
                })
                .collect(),
        }
    }

    pub fn best(&self) -> Option<&Address> {
        self.candidates.first().map(|c| &c.address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.candidates.iter().map(|c| &c.address)
    }

    pub fn into_addresses(self) -> Vec<Address> {
        self.candidates.into_iter().map(|c| c.address).collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Resolves free-text addresses against a text and a spatial provider.
pub struct Resolver<T, S> {
    text: T,
    spatial: S,
    limit: usize,
}

impl Resolver<OgcioClient, LandClient> {
    /// Resolver backed by the live OGCIO and Lands Department services.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let text = OgcioClient::new(&config.ogcio, &config.http)?;
        let spatial = LandClient::new(&config.land, &config.http)?;
        Ok(Self::new(text, spatial).with_limit(config.ogcio.limit))
    }
}

impl<T: TextLookup, S: SpatialLookup> Resolver<T, S> {
    pub fn new(text: T, spatial: S) -> Self {
        Self {
            text,
            spatial,
            limit: DEFAULT_OGCIO_LIMIT,
        }
    }

    /// Number of OGCIO suggestions to request per search
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Resolve one address. Provider failures are returned, never swallowed.
    pub async fn resolve(&self, address: &str) -> Result<Resolution> {
        let (text, land) = futures::try_join!(
            self.text.search(address, self.limit),
            self.spatial.search(address)
        )?;

        debug!(
            "Resolving '{}': {} ogcio, {} land records",
            address,
            text.len(),
            land.len()
        );

        let resolution = self.reconcile(text, land).await?;
        debug!("Resolved '{}' via {:?}", address, resolution.strategy);
        Ok(resolution)
    }

    /// Resolve many addresses with bounded concurrency, results in input order.
    pub async fn resolve_many(
        self: &Arc<Self>,
        addresses: &[String],
        options: BatchOptions,
    ) -> Result<Vec<Resolution>>
    where
        T: 'static,
        S: 'static,
    {
        batch::resolve_many(Arc::clone(self), addresses, options).await
    }

    async fn reconcile(
        &self,
        text: Vec<Address>,
        land: Vec<Address>,
    ) -> Result<Resolution, ProviderError> {
        let Some(top_land) = land.first() else {
            return Ok(Resolution::ranked(Strategy::TextOnly, text));
        };

        if top_text_agrees(&text, &land) {
            return Ok(Resolution::ranked(Strategy::Agreement, text));
        }

        let near = nearest_to(text, top_land);
        if !near.is_empty() {
            return Ok(Resolution {
                strategy: Strategy::NearestToLand,
                candidates: near,
            });
        }

        let land_address = top_land.full_address(Language::Chinese);
        if !land_address.is_empty() {
            debug!("Searching ogcio again with land address '{}'", land_address);
            let retry = self.text.search(&land_address, self.limit).await?;
            if is_near(retry.first(), top_land) {
                return Ok(Resolution::ranked(Strategy::Requery, retry));
            }
        }

        Ok(Resolution::ranked(Strategy::LandFallback, land))
    }
}

fn is_near(candidate: Option<&Address>, target: &Address) -> bool {
    candidate.is_some_and(|c| c.distance_to(target) < NEAR_THRESHOLD_KM)
}

/// Whether the top text result lies near any land result.
///
/// The location search does not always rank the right building first, so
/// every land result is checked.
fn top_text_agrees(text: &[Address], land: &[Address]) -> bool {
    let Some(best) = text.first() else {
        return false;
    };
    land.iter().any(|l| is_near(Some(best), l))
}

/// Text results near `target`, closest first. Equal distances keep their
/// text ranking.
fn nearest_to(text: Vec<Address>, target: &Address) -> Vec<Candidate> {
    let mut near: Vec<(f64, Address)> = text
        .into_iter()
        .filter_map(|t| {
            let d = t.distance_to(target);
            (d < NEAR_THRESHOLD_KM).then_some((d, t))
        })
        .collect();
    near.sort_by(|a, b| a.0.total_cmp(&b.0));

    near.into_iter()
        .map(|(d, address)| Candidate {
            address,
            distance: Some(d),
        })
        .collect()
}
