//! Lands Department location search record.

use serde::{Deserialize, Serialize};

use super::Language;

/// One entry of the location search response array.
///
/// `x`/`y` are HK1980 Grid easting/northing. They stay on the record and
/// never become the address coordinate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandRecord {
    #[serde(default, rename = "addressEN")]
    pub address_en: String,
    #[serde(default, rename = "addressZH")]
    pub address_zh: String,
    #[serde(default, rename = "nameEN")]
    pub name_en: String,
    #[serde(default, rename = "nameZH")]
    pub name_zh: String,
    #[serde(default, rename = "districtEN", skip_serializing_if = "Option::is_none")]
    pub district_en: Option<String>,
    #[serde(default, rename = "districtZH", skip_serializing_if = "Option::is_none")]
    pub district_zh: Option<String>,
    pub x: f64,
    pub y: f64,
}

impl LandRecord {
    pub fn full_address(&self, lang: Language) -> &str {
        match lang {
            Language::English => self.address_en.trim(),
            Language::Chinese => self.address_zh.trim(),
        }
    }

    pub fn name(&self, lang: Language) -> Option<&str> {
        let name = match lang {
            Language::English => self.name_en.trim(),
            Language::Chinese => self.name_zh.trim(),
        };
        (!name.is_empty()).then_some(name)
    }
}
