//! hkaddress - Hong Kong address resolution against the OGCIO Address Lookup
//! Service and the Lands Department location search.
//!
//! This library provides the providers, the reconciliation engine and the
//! batch runner used by the `resolve` binary.

pub mod config;
pub mod error;
pub mod land_sorter;
pub mod models;
pub mod proj;
pub mod providers;
pub mod resolver;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{Error, ProviderError};
pub use models::{Address, GeoPoint, Language, Source};
pub use resolver::{resolve_many, BatchOptions, Candidate, Resolution, Resolver, Strategy};
