//! CSW 2.0.2 catalog adapter.
//!
//! Requests are XML documents POSTed to the catalog endpoint. Exception
//! reports come back inside otherwise successful responses and are surfaced
//! as [`SearchOutcome::OkWithError`], never as a failed call.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use roxmltree::Node;
use std::sync::Arc;

use super::CatalogAdapter;
use crate::filter::{self, Filter, FilterPredicate};
use crate::model::{
    normalize_crs, normalize_crs_urn, BoundingBox, CswRecord, DcReference, DcUri, DublinCore,
    Format, Record, SearchOutcome, SearchQuery, SearchResult,
};
use crate::transport::Transport;
use crate::xml::{self, XmlWriter, NS_CSW, NS_DC, NS_DCT, NS_GML, NS_OGC, NS_OWS};

pub const CSW_VERSION: &str = "2.0.2";
pub const FILTER_VERSION: &str = "1.1.0";
pub const ISO_OUTPUT_SCHEMA: &str = "http://www.isotc211.org/2005/gmd";
const DEFAULT_ELEMENT_SET: &str = "full";
const DEFAULT_TYPE_NAMES: &str = "csw:Record";
const GENERIC_EXCEPTION: &str = "The catalog returned an exception report";

const XML_HEADERS: &[(&str, &str)] = &[
    ("Content-Type", "application/xml"),
    ("Accept", "application/xml"),
];

/// `csw:GetRecords` request document.
#[derive(Debug, Clone, PartialEq)]
pub struct GetRecordsRequest {
    pub start_position: u32,
    pub max_records: u32,
    pub element_set_name: String,
    pub type_names: String,
    pub output_schema: Option<String>,
    pub constraint: Option<Filter>,
}

impl GetRecordsRequest {
    pub fn new(start_position: u32, max_records: u32) -> Self {
        Self {
            start_position,
            max_records,
            element_set_name: DEFAULT_ELEMENT_SET.to_string(),
            type_names: DEFAULT_TYPE_NAMES.to_string(),
            output_schema: None,
            constraint: None,
        }
    }

    pub fn with_constraint(mut self, predicate: FilterPredicate) -> Self {
        self.constraint = Some(filter::filter(predicate));
        self
    }

    pub fn to_xml(&self) -> Result<String> {
        let start_position = self.start_position.to_string();
        let max_records = self.max_records.to_string();
        let mut attributes = vec![
            ("xmlns:csw", NS_CSW),
            ("xmlns:ogc", NS_OGC),
            ("xmlns:gml", NS_GML),
            ("xmlns:ows", NS_OWS),
            ("xmlns:dc", NS_DC),
            ("xmlns:dct", NS_DCT),
            ("service", "CSW"),
            ("version", CSW_VERSION),
            ("resultType", "results"),
            ("startPosition", start_position.as_str()),
            ("maxRecords", max_records.as_str()),
        ];
        if let Some(schema) = &self.output_schema {
            attributes.push(("outputSchema", schema.as_str()));
        }

        let mut writer = XmlWriter::new()?;
        writer.start("csw:GetRecords", &attributes)?;
        writer.start("csw:Query", &[("typeNames", self.type_names.as_str())])?;
        writer.text_element("csw:ElementSetName", &[], &self.element_set_name)?;
        if let Some(constraint) = &self.constraint {
            writer.start("csw:Constraint", &[("version", FILTER_VERSION)])?;
            constraint.write(&mut writer, false)?;
            writer.end("csw:Constraint")?;
        }
        writer.end("csw:Query")?;
        writer.end("csw:GetRecords")?;
        writer.finish()
    }

    pub fn from_xml(body: &str) -> Result<Self> {
        let doc = xml::parse(body)?;
        let root = doc.root_element();
        if !xml::is_element(root, "GetRecords") {
            bail!("Expected csw:GetRecords, found <{}>", xml::local_name(root));
        }
        let number = |name: &str, default: u32| -> Result<u32> {
            match xml::attr(root, name) {
                Some(value) => value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid {} attribute: {:?}", name, value)),
                None => Ok(default),
            }
        };
        let query = xml::child(root, "Query").context("csw:GetRecords without csw:Query")?;
        let filter_node = xml::child(query, "Constraint").and_then(|c| xml::child(c, "Filter"));
        let constraint = match filter_node {
            Some(node) => Some(Filter::from_node(node)?),
            None => None,
        };

        Ok(Self {
            start_position: number("startPosition", 1)?,
            max_records: number("maxRecords", 10)?,
            element_set_name: xml::child_text(query, "ElementSetName")
                .unwrap_or_else(|| DEFAULT_ELEMENT_SET.to_string()),
            type_names: xml::attr(query, "typeNames")
                .unwrap_or(DEFAULT_TYPE_NAMES)
                .to_string(),
            output_schema: xml::attr(root, "outputSchema").map(str::to_string),
            constraint,
        })
    }
}

/// `csw:GetRecordById` request document.
#[derive(Debug, Clone, PartialEq)]
pub struct GetRecordByIdRequest {
    pub ids: Vec<String>,
    pub element_set_name: String,
    pub output_schema: Option<String>,
}

impl GetRecordByIdRequest {
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            ids,
            element_set_name: DEFAULT_ELEMENT_SET.to_string(),
            output_schema: None,
        }
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut attributes = vec![
            ("xmlns:csw", NS_CSW),
            ("service", "CSW"),
            ("version", CSW_VERSION),
        ];
        if let Some(schema) = &self.output_schema {
            attributes.push(("outputSchema", schema.as_str()));
        }

        let mut writer = XmlWriter::new()?;
        writer.start("csw:GetRecordById", &attributes)?;
        writer.text_element("csw:ElementSetName", &[], &self.element_set_name)?;
        for id in &self.ids {
            writer.text_element("csw:Id", &[], id)?;
        }
        writer.end("csw:GetRecordById")?;
        writer.finish()
    }
}

/// Exception text of an OWS exception report, or `None` for any other document.
pub fn exception_message(root: Node<'_, '_>) -> Option<String> {
    if !matches!(
        xml::local_name(root),
        "ExceptionReport" | "ServiceExceptionReport"
    ) {
        return None;
    }
    let message = xml::descendant(root, "ExceptionText")
        .or_else(|| xml::descendant(root, "ServiceException"))
        .and_then(xml::text)
        .unwrap_or_else(|| GENERIC_EXCEPTION.to_string());
    Some(message)
}

/// Normalizes a `csw:GetRecordsResponse` body.
pub fn parse_get_records_response(body: &str) -> Result<SearchOutcome> {
    let doc = xml::parse(body).context("Failed to parse CSW GetRecords response")?;
    let root = doc.root_element();
    if let Some(message) = exception_message(root) {
        return Ok(SearchOutcome::OkWithError(message));
    }

    let results = xml::child(root, "SearchResults")
        .with_context(|| format!("CSW response <{}> has no SearchResults", xml::local_name(root)))?;
    let count = |name: &str| -> Result<u32> {
        match xml::attr(results, name) {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} in CSW response: {:?}", name, value)),
            None => Ok(0),
        }
    };

    Ok(SearchOutcome::Ok(SearchResult {
        number_of_records_matched: count("numberOfRecordsMatched")?,
        number_of_records_returned: count("numberOfRecordsReturned")?,
        next_record: count("nextRecord")?,
        records: parse_records(results),
        error: None,
    }))
}

/// Normalizes a `csw:GetRecordByIdResponse` body.
pub fn parse_get_record_by_id_response(body: &str) -> Result<SearchOutcome> {
    let doc = xml::parse(body).context("Failed to parse CSW GetRecordById response")?;
    let root = doc.root_element();
    if let Some(message) = exception_message(root) {
        return Ok(SearchOutcome::OkWithError(message));
    }
    let records = parse_records(root);
    let count = records.len() as u32;
    Ok(SearchOutcome::Ok(SearchResult {
        number_of_records_matched: count,
        number_of_records_returned: count,
        next_record: 0,
        records,
        error: None,
    }))
}

fn parse_records(container: Node<'_, '_>) -> Vec<Record> {
    xml::elements(container)
        .map(|node| Record::Csw(parse_record(node)))
        .collect()
}

fn parse_record(node: Node<'_, '_>) -> CswRecord {
    let dc = dublin_core(node);
    CswRecord {
        date_stamp: xml::child(node, "dateStamp").and_then(xml::text),
        file_identifier: xml::child(node, "fileIdentifier").and_then(xml::text),
        identification_info: xml::child(node, "identificationInfo").map(xml::raw),
        bounding_box: iso_bounding_box(node).or_else(|| ows_bounding_box(node)),
        dc: if dc.is_empty() { None } else { Some(dc) },
    }
}

/// Geographic extent of an ISO record, in the CRS named by its reference system.
fn iso_bounding_box(node: Node<'_, '_>) -> Option<BoundingBox> {
    let info = xml::child(node, "identificationInfo")?;
    let bbox = xml::descendant(info, "EX_GeographicBoundingBox")?;
    let value = |name: &str| {
        xml::child(bbox, name)
            .and_then(xml::text)
            .and_then(|v| xml::parse_f64(&v))
    };
    let code = xml::child(node, "referenceSystemInfo")
        .and_then(|n| xml::descendant(n, "code"))
        .and_then(xml::text);
    Some(BoundingBox {
        extent: [
            value("westBoundLongitude")?,
            value("southBoundLatitude")?,
            value("eastBoundLongitude")?,
            value("northBoundLatitude")?,
        ],
        crs: normalize_crs(code.as_deref()),
    })
}

/// `ows:BoundingBox` / `ows:WGS84BoundingBox` of a Dublin Core record.
fn ows_bounding_box(node: Node<'_, '_>) -> Option<BoundingBox> {
    let (bbox, wgs84) = match xml::child(node, "WGS84BoundingBox") {
        Some(bbox) => (bbox, true),
        None => (xml::child(node, "BoundingBox")?, false),
    };
    let (mut min_x, mut min_y) = xml::parse_corner(&xml::child_text(bbox, "LowerCorner")?)?;
    let (mut max_x, mut max_y) = xml::parse_corner(&xml::child_text(bbox, "UpperCorner")?)?;

    let crs_attr = xml::attr(bbox, "crs");
    let crs = match (wgs84, crs_attr) {
        (true, _) => normalize_crs(None),
        (false, Some(value)) => normalize_crs_urn(value),
        (false, None) => normalize_crs(None),
    };
    // EPSG:4326 URNs use latitude/longitude axis order.
    if !wgs84 && crs_attr.is_some_and(|c| c.starts_with("urn:")) && crs == "EPSG:4326" {
        std::mem::swap(&mut min_x, &mut min_y);
        std::mem::swap(&mut max_x, &mut max_y);
    }
    Some(BoundingBox {
        extent: [min_x, min_y, max_x, max_y],
        crs,
    })
}

fn dublin_core(node: Node<'_, '_>) -> DublinCore {
    let mut dc = DublinCore::default();
    for element in xml::elements(node) {
        let namespace = element.tag_name().namespace();
        if namespace != Some(NS_DC) && namespace != Some(NS_DCT) {
            continue;
        }
        let name = xml::local_name(element);
        let value = xml::text(element);
        match name {
            "URI" => dc.uri.push(DcUri {
                name: xml::attr(element, "name").map(str::to_string),
                description: xml::attr(element, "description").map(str::to_string),
                protocol: xml::attr(element, "protocol").map(str::to_string),
                value: value.unwrap_or_default(),
            }),
            "references" => {
                if let Some(value) = value {
                    dc.references.push(DcReference {
                        scheme: xml::attr(element, "scheme").map(str::to_string),
                        value,
                    });
                }
            }
            _ => {
                if let Some(value) = value {
                    dc.add(name, value);
                }
            }
        }
    }
    dc
}

pub struct CswAdapter {
    transport: Arc<dyn Transport>,
    output_schema: Option<String>,
}

impl CswAdapter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            output_schema: None,
        }
    }

    /// Ask the catalog for a specific record schema, e.g. [`ISO_OUTPUT_SCHEMA`].
    pub fn with_output_schema(mut self, schema: &str) -> Self {
        self.output_schema = Some(schema.to_string());
        self
    }

    pub async fn get_record_by_id(&self, url: &str, ids: &[String]) -> Result<SearchOutcome> {
        let mut request = GetRecordByIdRequest::new(ids.to_vec());
        request.output_schema = self.output_schema.clone();
        let body = request.to_xml()?;

        tracing::debug!("CSW GetRecordById {} ids={:?}", url, ids);
        let response = self.transport.post(url, body, XML_HEADERS).await?;
        let outcome = parse_get_record_by_id_response(&response)?;
        if let Some(message) = outcome.error() {
            tracing::warn!("CSW exception from {}: {}", url, message);
        }
        Ok(outcome)
    }
}

#[async_trait]
impl CatalogAdapter for CswAdapter {
    fn format(&self) -> Format {
        Format::Csw
    }

    async fn get_records(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        let mut request = GetRecordsRequest::new(query.start_position, query.max_records);
        request.output_schema = self.output_schema.clone();
        request.constraint = match (&query.filter, query.text.as_deref().map(str::trim)) {
            (Some(predicate), _) => Some(filter::filter(predicate.clone())),
            (None, Some(text)) if !text.is_empty() => Some(filter::filter(filter::any_text(text))),
            _ => None,
        };
        let body = request.to_xml()?;

        tracing::debug!(
            "CSW GetRecords {} start={} max={}",
            query.url,
            query.start_position,
            query.max_records
        );
        let response = self.transport.post(&query.url, body, XML_HEADERS).await?;
        let outcome = parse_get_records_response(&response)?;
        if let Some(message) = outcome.error() {
            tracing::warn!("CSW exception from {}: {}", query.url, message);
        }
        Ok(outcome)
    }

    async fn text_search(
        &self,
        url: &str,
        start_position: u32,
        max_records: u32,
        text: &str,
    ) -> Result<SearchOutcome> {
        let query = SearchQuery::new(Format::Csw, url, start_position, max_records)
            .with_filter(filter::any_text(text));
        self.get_records(&query).await
    }
}
