//! Normalized search types shared by every catalog protocol.
//!
//! Each protocol adapter parses its own wire format into a typed intermediate
//! representation and then produces the [`Record`] and [`SearchResult`] shapes
//! defined here, so callers never need to know which protocol answered.

use anyhow::bail;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::filter::FilterPredicate;

pub const DEFAULT_CRS: &str = "EPSG:4326";

/// Catalog protocol discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csw,
    Wms,
    Wmts,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Csw => "csw",
            Format::Wms => "wms",
            Format::Wmts => "wmts",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csw" => Ok(Format::Csw),
            "wms" => Ok(Format::Wms),
            "wmts" => Ok(Format::Wmts),
            other => bail!("unsupported catalog format: {:?}", other),
        }
    }
}

/// One search call. `start_position` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub format: Format,
    pub url: String,
    pub start_position: u32,
    pub max_records: u32,
    pub filter: Option<FilterPredicate>,
    pub text: Option<String>,
}

impl SearchQuery {
    pub fn new(format: Format, url: &str, start_position: u32, max_records: u32) -> Self {
        Self {
            format,
            url: url.to_string(),
            start_position,
            max_records,
            filter: None,
            text: None,
        }
    }

    pub fn with_filter(mut self, filter: FilterPredicate) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }
}

/// Extent is `[west, south, east, north]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub extent: [f64; 4],
    pub crs: String,
}

/// Maps a source CRS code onto an `EPSG:` identifier.
///
/// `"WGS 1984"` and a missing or empty code both mean EPSG:4326.
pub fn normalize_crs(code: Option<&str>) -> String {
    match code.map(str::trim) {
        None | Some("") => DEFAULT_CRS.to_string(),
        Some("WGS 1984") => DEFAULT_CRS.to_string(),
        Some(code) if code.starts_with("EPSG:") => code.to_string(),
        Some(code) => format!("EPSG:{}", code),
    }
}

/// Normalizes CRS strings found in capability documents, including OGC URNs
/// such as `urn:ogc:def:crs:EPSG::3857` and `urn:ogc:def:crs:EPSG:6.6:4326`.
pub fn normalize_crs_urn(value: &str) -> String {
    let value = value.trim();
    if value.starts_with("urn:") {
        let code = value.rsplit(':').next().unwrap_or_default();
        if value.contains("CRS84") || code == "CRS84" {
            return DEFAULT_CRS.to_string();
        }
        return normalize_crs(Some(code));
    }
    normalize_crs(Some(value))
}

/// Dublin Core element value: single occurrences stay scalar, repeats become a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DcValue {
    Single(String),
    Many(Vec<String>),
}

impl DcValue {
    pub fn push(&mut self, value: String) {
        match self {
            DcValue::Single(first) => {
                *self = DcValue::Many(vec![std::mem::take(first), value]);
            }
            DcValue::Many(values) => values.push(value),
        }
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            DcValue::Single(value) => Some(value),
            DcValue::Many(values) => values.first().map(String::as_str),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            DcValue::Single(value) => vec![value.as_str()],
            DcValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// `dc:URI` link metadata, e.g. an associated WMS endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcUri {
    pub name: Option<String>,
    pub description: Option<String>,
    pub protocol: Option<String>,
    pub value: String,
}

/// `dct:references`, with its `scheme` attribute when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DublinCore {
    #[serde(flatten)]
    pub elements: IndexMap<String, DcValue>,
    /// Always a list, even for a single `URI` element.
    #[serde(rename = "URI", default, skip_serializing_if = "Vec::is_empty")]
    pub uri: Vec<DcUri>,
    /// Every `references` element; never part of `elements`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<DcReference>,
}

impl DublinCore {
    pub fn add(&mut self, name: &str, value: String) {
        match self.elements.get_mut(name) {
            Some(existing) => existing.push(value),
            None => {
                self.elements.insert(name.to_string(), DcValue::Single(value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&DcValue> {
        self.elements.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.uri.is_empty() && self.references.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CswRecord {
    pub date_stamp: Option<String>,
    pub file_identifier: Option<String>,
    /// Raw `identificationInfo` XML, passed through untouched.
    pub identification_info: Option<String>,
    pub bounding_box: Option<BoundingBox>,
    pub dc: Option<DublinCore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WmsRecord {
    pub name: String,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub bounding_box: Option<BoundingBox>,
    #[serde(rename = "SRS")]
    pub srs: Vec<String>,
    pub online_resource: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WmtsRecord {
    pub identifier: String,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub bounding_box: Option<BoundingBox>,
    #[serde(rename = "SRS")]
    pub srs: Vec<String>,
    pub tile_matrix_sets: Vec<String>,
    pub formats: Vec<String>,
    #[serde(rename = "GetTileURL")]
    pub get_tile_url: Option<String>,
}

/// A discoverable layer or metadata entry, whatever protocol produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum Record {
    Csw(CswRecord),
    Wms(WmsRecord),
    Wmts(WmtsRecord),
}

impl Record {
    /// Layer name; CSW records have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            Record::Csw(_) => None,
            Record::Wms(record) => Some(&record.name),
            Record::Wmts(record) => Some(&record.identifier),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Record::Csw(record) => record
                .dc
                .as_ref()
                .and_then(|dc| dc.get("title"))
                .and_then(DcValue::first),
            Record::Wms(record) => record.title.as_deref(),
            Record::Wmts(record) => record.title.as_deref(),
        }
    }

    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        match self {
            Record::Csw(record) => record.bounding_box.as_ref(),
            Record::Wms(record) => record.bounding_box.as_ref(),
            Record::Wmts(record) => record.bounding_box.as_ref(),
        }
    }

    /// Stable key for deduplication and UI keying.
    pub fn key(&self) -> String {
        match self {
            Record::Csw(record) => record
                .file_identifier
                .clone()
                .or_else(|| {
                    record
                        .dc
                        .as_ref()
                        .and_then(|dc| dc.get("identifier"))
                        .and_then(DcValue::first)
                        .map(str::to_string)
                })
                .unwrap_or_default(),
            Record::Wms(record) => record.name.clone(),
            Record::Wmts(record) => record.identifier.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub number_of_records_matched: u32,
    pub number_of_records_returned: u32,
    pub next_record: u32,
    pub records: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResult {
    pub fn from_error(message: String) -> Self {
        Self {
            error: Some(message),
            ..Default::default()
        }
    }
}

/// Successful completion of a search call.
///
/// Protocol exception reports arrive inside well-formed responses and are
/// reported as [`SearchOutcome::OkWithError`]; transport and parse failures
/// are the `Err` side of the surrounding `anyhow::Result`.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Ok(SearchResult),
    OkWithError(String),
}

impl SearchOutcome {
    pub fn result(&self) -> Option<&SearchResult> {
        match self {
            SearchOutcome::Ok(result) => Some(result),
            SearchOutcome::OkWithError(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SearchOutcome::Ok(_) => None,
            SearchOutcome::OkWithError(message) => Some(message),
        }
    }

    /// Shape handed to UI code: a result whose only populated field is
    /// `error` for protocol-level exceptions.
    pub fn into_result_shape(self) -> SearchResult {
        match self {
            SearchOutcome::Ok(result) => result,
            SearchOutcome::OkWithError(message) => SearchResult::from_error(message),
        }
    }
}
