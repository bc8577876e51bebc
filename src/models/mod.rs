//! Address records and the provider response schemas they are parsed from.

pub mod address;
pub mod land;
pub mod ogcio;

pub use address::{Address, GeoPoint, Language, Record, Source};
pub use land::LandRecord;
pub use ogcio::{OgcioRecord, OgcioResponse};
