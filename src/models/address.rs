//! Geocoded address value object shared by both providers.

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use super::land::LandRecord;
use super::ogcio::OgcioRecord;

/// Which provider produced an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// OGCIO Address Lookup Service (text similarity)
    Ogcio,
    /// Lands Department location search (spatial)
    Land,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Ogcio => write!(f, "ogcio"),
            Source::Land => write!(f, "land"),
        }
    }
}

/// Output language for formatted addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "eng")]
    English,
    #[serde(rename = "chi")]
    Chinese,
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eng" | "en" | "english" => Ok(Language::English),
            "chi" | "zh" | "zh-hant" | "chinese" => Ok(Language::Chinese),
            other => Err(format!("unknown language '{}'", other)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::English => write!(f, "eng"),
            Language::Chinese => write!(f, "chi"),
        }
    }
}

/// WGS84 point (lat/lon in degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lon, p.lat)
    }
}

/// Provider payload kept for formatting
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Record {
    Ogcio(OgcioRecord),
    Land(LandRecord),
}

/// A single geocoded candidate.
///
/// Immutable once built by a provider adapter. The coordinate is always WGS84.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    source: Source,
    coordinate: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    record: Record,
}

impl Address {
    pub fn from_ogcio(record: OgcioRecord, coordinate: GeoPoint) -> Self {
        Self {
            source: Source::Ogcio,
            coordinate,
            score: Some(record.score),
            record: Record::Ogcio(record),
        }
    }

    pub fn from_land(record: LandRecord, coordinate: GeoPoint) -> Self {
        Self {
            source: Source::Land,
            coordinate,
            score: None,
            record: Record::Land(record),
        }
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn coordinate(&self) -> GeoPoint {
        self.coordinate
    }

    /// Provider relevance score. Only OGCIO records carry one and it is
    /// only comparable within a single OGCIO result set.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Great-circle distance to `other`, in kilometres.
    pub fn distance_to(&self, other: &Address) -> f64 {
        let a: Point<f64> = self.coordinate.into();
        let b: Point<f64> = other.coordinate.into();
        Haversine.distance(a, b) / 1000.0
    }

    /// Formatted full address, or an empty string when the record has
    /// nothing in `lang`.
    pub fn full_address(&self, lang: Language) -> String {
        match &self.record {
            Record::Ogcio(r) => r.full_address(lang),
            Record::Land(r) => r.full_address(lang).to_string(),
        }
    }

    /// Building or place name, if the record has one in `lang`.
    pub fn name(&self, lang: Language) -> Option<&str> {
        match &self.record {
            Record::Ogcio(r) => r.building_name(lang),
            Record::Land(r) => r.name(lang),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{land_at, ogcio_at};

    #[test]
    fn test_distance_in_kilometres() {
        // 0.001 deg of latitude is about 111 m
        let a = ogcio_at("A", 114.1700, 22.3000, 1.0);
        let b = land_at("B", 114.1700, 22.3010);
        let d = a.distance_to(&b);
        assert!((d - 0.1112).abs() < 0.001, "distance was {d}");
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = ogcio_at("A", 114.1700, 22.3000, 1.0);
        let b = land_at("B", 114.1750, 22.2950);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-12);
    }

    #[test]
    fn test_source_and_score() {
        let a = ogcio_at("A", 114.17, 22.30, 0.9);
        let b = land_at("B", 114.17, 22.30);
        assert_eq!(a.source(), Source::Ogcio);
        assert_eq!(a.score(), Some(0.9));
        assert_eq!(b.source(), Source::Land);
        assert_eq!(b.score(), None);
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("chi".parse::<Language>().unwrap(), Language::Chinese);
        assert_eq!("EN".parse::<Language>().unwrap(), Language::English);
        assert!("fr".parse::<Language>().is_err());
    }
}
