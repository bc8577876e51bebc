//! OGCIO Address Lookup Service response schema.
//!
//! The service answers with PascalCase JSON. Numeric fields arrive as
//! either numbers or strings depending on the record, so they go through
//! [`lenient_f64`].

use serde::{Deserialize, Deserializer, Serialize};

use super::Language;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OgcioResponse {
    #[serde(default)]
    pub suggested_address: Vec<SuggestedAddress>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SuggestedAddress {
    pub address: SuggestedAddressBody,
    pub validation_information: ValidationInformation,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SuggestedAddressBody {
    pub premises_address: PremisesAddress,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidationInformation {
    #[serde(deserialize_with = "lenient_f64")]
    pub score: f64,
}

/// One matched premises, flattened out of the envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PremisesAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eng_premises_address: Option<EngPremisesAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chi_premises_address: Option<ChiPremisesAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geospatial_information: Option<GeospatialInformation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EngPremisesAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eng_block: Option<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eng_estate: Option<Estate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eng_street: Option<Street>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eng_village: Option<Village>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eng_district: Option<District>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChiPremisesAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chi_block: Option<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chi_estate: Option<Estate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chi_street: Option<Street>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chi_village: Option<Village>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chi_district: Option<District>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    #[serde(default)]
    pub block_descriptor: Option<String>,
    #[serde(default)]
    pub block_no: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Estate {
    #[serde(default)]
    pub estate_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Street {
    #[serde(default)]
    pub street_name: Option<String>,
    #[serde(default)]
    pub building_no_from: Option<String>,
    #[serde(default)]
    pub building_no_to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Village {
    #[serde(default)]
    pub village_name: Option<String>,
    #[serde(default)]
    pub building_no_from: Option<String>,
    #[serde(default)]
    pub building_no_to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct District {
    #[serde(default)]
    pub dc_district: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeospatialInformation {
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub northing: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub easting: Option<f64>,
}

/// A parsed OGCIO match together with its provider score.
#[derive(Debug, Clone, Serialize)]
pub struct OgcioRecord {
    pub score: f64,
    pub premises: PremisesAddress,
}

impl From<SuggestedAddress> for OgcioRecord {
    fn from(s: SuggestedAddress) -> Self {
        Self {
            score: s.validation_information.score,
            premises: s.address.premises_address,
        }
    }
}

impl OgcioRecord {
    pub fn geospatial(&self) -> Option<&GeospatialInformation> {
        self.premises.geospatial_information.as_ref()
    }

    pub fn building_name(&self, lang: Language) -> Option<&str> {
        let name = match lang {
            Language::English => self.premises.eng_premises_address.as_ref()?.building_name.as_deref(),
            Language::Chinese => self.premises.chi_premises_address.as_ref()?.building_name.as_deref(),
        };
        name.filter(|n| !n.is_empty())
    }

    pub fn full_address(&self, lang: Language) -> String {
        match lang {
            Language::English => self
                .premises
                .eng_premises_address
                .as_ref()
                .map(format_english)
                .unwrap_or_default(),
            Language::Chinese => self
                .premises
                .chi_premises_address
                .as_ref()
                .map(format_chinese)
                .unwrap_or_default(),
        }
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn building_no(from: &Option<String>, to: &Option<String>) -> Option<String> {
    match (non_empty(from), non_empty(to)) {
        (Some(f), Some(t)) if f != t => Some(format!("{}-{}", f, t)),
        (Some(f), _) => Some(f.to_string()),
        _ => None,
    }
}

/// "BLOCK 2, TAIKOO SHING, 18 TAIKOO SHING ROAD, EASTERN DISTRICT, HK"
fn format_english(addr: &EngPremisesAddress) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(block) = &addr.eng_block {
        let text = [non_empty(&block.block_descriptor), non_empty(&block.block_no)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            parts.push(text);
        }
    }
    if let Some(name) = non_empty(&addr.building_name) {
        parts.push(name.to_string());
    }
    if let Some(name) = addr.eng_estate.as_ref().and_then(|e| non_empty(&e.estate_name)) {
        parts.push(name.to_string());
    }
    if let Some(village) = &addr.eng_village {
        if let Some(name) = non_empty(&village.village_name) {
            match building_no(&village.building_no_from, &village.building_no_to) {
                Some(no) => parts.push(format!("{} {}", no, name)),
                None => parts.push(name.to_string()),
            }
        }
    }
    if let Some(street) = &addr.eng_street {
        if let Some(name) = non_empty(&street.street_name) {
            match building_no(&street.building_no_from, &street.building_no_to) {
                Some(no) => parts.push(format!("{} {}", no, name)),
                None => parts.push(name.to_string()),
            }
        }
    }
    if let Some(d) = addr.eng_district.as_ref().and_then(|d| non_empty(&d.dc_district)) {
        parts.push(d.to_string());
    }
    if let Some(r) = non_empty(&addr.region) {
        parts.push(r.to_string());
    }

    parts.join(", ")
}

/// "香港東區太古城道18號太古城2座": largest unit first, no separators
fn format_chinese(addr: &ChiPremisesAddress) -> String {
    let mut out = String::new();

    if let Some(r) = non_empty(&addr.region) {
        out.push_str(r);
    }
    if let Some(d) = addr.chi_district.as_ref().and_then(|d| non_empty(&d.dc_district)) {
        out.push_str(d);
    }
    if let Some(village) = &addr.chi_village {
        if let Some(name) = non_empty(&village.village_name) {
            out.push_str(name);
            if let Some(no) = building_no(&village.building_no_from, &village.building_no_to) {
                out.push_str(&no);
                out.push('號');
            }
        }
    }
    if let Some(street) = &addr.chi_street {
        if let Some(name) = non_empty(&street.street_name) {
            out.push_str(name);
            if let Some(no) = building_no(&street.building_no_from, &street.building_no_to) {
                out.push_str(&no);
                out.push('號');
            }
        }
    }
    if let Some(name) = addr.chi_estate.as_ref().and_then(|e| non_empty(&e.estate_name)) {
        out.push_str(name);
    }
    if let Some(name) = non_empty(&addr.building_name) {
        out.push_str(name);
    }
    if let Some(block) = &addr.chi_block {
        if let Some(no) = non_empty(&block.block_no) {
            out.push_str(no);
        }
        if let Some(desc) = non_empty(&block.block_descriptor) {
            out.push_str(desc);
        }
    }

    out
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<NumberOrString>::deserialize(deserializer)? {
            Some(NumberOrString::Number(n)) => Some(n),
            Some(NumberOrString::String(s)) => s.trim().parse().ok(),
            None => None,
        },
    )
}
