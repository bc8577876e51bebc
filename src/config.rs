//! Resolver configuration, loadable from TOML.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_OGCIO_ENDPOINT: &str = "https://www.als.ogcio.gov.hk/lookup";
pub const DEFAULT_LAND_ENDPOINT: &str = "https://geodata.gov.hk/gs/api/v1.0.0/locationSearch";

/// Number of OGCIO suggestions requested per lookup
pub const DEFAULT_OGCIO_LIMIT: usize = 200;
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub ogcio: OgcioConfig,
    pub land: LandConfig,
    pub http: HttpConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OgcioConfig {
    pub endpoint: String,
    pub limit: usize,
}

impl Default for OgcioConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OGCIO_ENDPOINT.to_string(),
            limit: DEFAULT_OGCIO_LIMIT,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LandConfig {
    pub endpoint: String,
}

impl Default for LandConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LAND_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout, applied to both providers
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("hkaddress/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BatchConfig {
    pub concurrency_limit: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
