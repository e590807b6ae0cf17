//! WMS adapter: capabilities-backed layer search plus DescribeLayer.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use roxmltree::Node;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::csw::exception_message;
use super::CatalogAdapter;
use crate::cache::{CapabilitiesDocument, CapabilityCache};
use crate::model::{
    BoundingBox, Format, Record, SearchOutcome, SearchQuery, SearchResult, WmsRecord, DEFAULT_CRS,
};
use crate::paging::{flatten_layers, matches_text, paginate, LayerNode};
use crate::transport::Transport;
use crate::url_builder::{build_url, capabilities_url};
use crate::xml;

pub const CAPABILITIES_VERSION: &str = "1.3.0";
pub const DESCRIBE_LAYER_VERSION: &str = "1.1.1";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WmsLayer {
    pub name: Option<String>,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    /// Own CRS list plus those inherited from enclosing layers.
    pub crs: Vec<String>,
    /// Own geographic extent, or the nearest ancestor's.
    pub bounding_box: Option<BoundingBox>,
    pub layers: Vec<WmsLayer>,
}

impl LayerNode for WmsLayer {
    fn identity(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn abstract_text(&self) -> Option<&str> {
        self.abstract_text.as_deref()
    }

    fn children(&self) -> &[Self] {
        &self.layers
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WmsCapabilities {
    pub version: Option<String>,
    pub layers: Vec<WmsLayer>,
    /// CRS list advertised by the top-level layer.
    pub crs: Vec<String>,
    /// `GetMap` online resource.
    pub get_map_url: Option<String>,
}

impl WmsCapabilities {
    pub fn parse(body: &str) -> Result<Self> {
        let doc = xml::parse(body).context("Failed to parse WMS capabilities")?;
        let root = doc.root_element();
        if let Some(message) = exception_message(root) {
            bail!("WMS service exception: {}", message);
        }
        if !matches!(
            xml::local_name(root),
            "WMS_Capabilities" | "WMT_MS_Capabilities"
        ) {
            bail!("Not a WMS capabilities document: <{}>", xml::local_name(root));
        }
        let capability =
            xml::child(root, "Capability").context("WMS capabilities without Capability")?;

        let layers: Vec<WmsLayer> = xml::children(capability, "Layer")
            .map(|node| parse_layer(node, None))
            .collect();
        let get_map_url = xml::path(
            capability,
            &["Request", "GetMap", "DCPType", "HTTP", "Get", "OnlineResource"],
        )
        .and_then(|node| xml::attr(node, "href"))
        .map(str::to_string);

        Ok(Self {
            version: xml::attr(root, "version").map(str::to_string),
            crs: layers.first().map(|layer| layer.crs.clone()).unwrap_or_default(),
            layers,
            get_map_url,
        })
    }

    /// Named leaf layers, depth-first.
    pub fn flat_layers(&self) -> Vec<&WmsLayer> {
        flatten_layers(&self.layers)
    }

    fn record(&self, layer: &WmsLayer) -> WmsRecord {
        WmsRecord {
            name: layer.name.clone().unwrap_or_default(),
            title: layer.title.clone(),
            abstract_text: layer.abstract_text.clone(),
            bounding_box: layer.bounding_box.clone(),
            srs: self.crs.clone(),
            online_resource: self.get_map_url.clone(),
        }
    }
}

fn parse_layer(node: Node<'_, '_>, parent: Option<&WmsLayer>) -> WmsLayer {
    let mut crs: Vec<String> = parent.map(|p| p.crs.clone()).unwrap_or_default();
    for value in xml::children(node, "CRS")
        .chain(xml::children(node, "SRS"))
        .filter_map(xml::text)
    {
        for code in value.split_whitespace() {
            if !crs.iter().any(|c| c == code) {
                crs.push(code.to_string());
            }
        }
    }

    let mut layer = WmsLayer {
        name: xml::child_text(node, "Name"),
        title: xml::child_text(node, "Title"),
        abstract_text: xml::child_text(node, "Abstract"),
        crs,
        bounding_box: geographic_bounding_box(node)
            .or_else(|| parent.and_then(|p| p.bounding_box.clone())),
        layers: Vec::new(),
    };
    layer.layers = xml::children(node, "Layer")
        .map(|child| parse_layer(child, Some(&layer)))
        .collect();
    layer
}

/// `EX_GeographicBoundingBox` (1.3.0) or `LatLonBoundingBox` (1.1.1).
fn geographic_bounding_box(node: Node<'_, '_>) -> Option<BoundingBox> {
    if let Some(bbox) = xml::child(node, "EX_GeographicBoundingBox") {
        let value = |name: &str| xml::child_text(bbox, name).and_then(|v| xml::parse_f64(&v));
        return Some(BoundingBox {
            extent: [
                value("westBoundLongitude")?,
                value("southBoundLatitude")?,
                value("eastBoundLongitude")?,
                value("northBoundLatitude")?,
            ],
            crs: DEFAULT_CRS.to_string(),
        });
    }
    let bbox = xml::child(node, "LatLonBoundingBox")?;
    let value = |name: &str| xml::attr(bbox, name).and_then(xml::parse_f64);
    Some(BoundingBox {
        extent: [value("minx")?, value("miny")?, value("maxx")?, value("maxy")?],
        crs: DEFAULT_CRS.to_string(),
    })
}

/// One `LayerDescription` of a DescribeLayer response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescription {
    pub name: Option<String>,
    #[serde(rename = "owsURL")]
    pub ows_url: Option<String>,
    pub ows_type: Option<String>,
}

impl LayerDescription {
    pub fn is_wfs(&self) -> bool {
        self.ows_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("WFS"))
    }
}

/// Parses both the 1.1.1 attribute form and the SLD 1.1 element form.
pub fn parse_describe_layer(body: &str) -> Result<Vec<LayerDescription>> {
    let doc = xml::parse(body).context("Failed to parse WMS DescribeLayer response")?;
    let root = doc.root_element();
    if let Some(message) = exception_message(root) {
        bail!("WMS DescribeLayer exception: {}", message);
    }

    Ok(root
        .descendants()
        .filter(|n| xml::is_element(*n, "LayerDescription"))
        .map(|node| LayerDescription {
            name: xml::attr(node, "name").map(str::to_string).or_else(|| {
                xml::child(node, "TypeName")
                    .and_then(|t| xml::elements(t).next())
                    .and_then(xml::text)
            }),
            ows_url: xml::attr(node, "owsURL")
                .or_else(|| xml::attr(node, "wfs"))
                .or_else(|| xml::child(node, "OnlineResource").and_then(|r| xml::attr(r, "href")))
                .map(str::to_string),
            ows_type: xml::attr(node, "owsType")
                .map(str::to_string)
                .or_else(|| xml::child_text(node, "owsType")),
        })
        .collect())
}

pub struct WmsAdapter {
    transport: Arc<dyn Transport>,
    cache: Arc<CapabilityCache>,
}

impl WmsAdapter {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<CapabilityCache>) -> Self {
        Self { transport, cache }
    }

    /// Fetches and parses capabilities, bypassing the cache.
    pub async fn get_capabilities(&self, url: &str) -> Result<WmsCapabilities> {
        let request_url = capabilities_url(url, "WMS", CAPABILITIES_VERSION)?;
        tracing::debug!("WMS GetCapabilities {}", request_url);
        let body = self.transport.get(&request_url).await?;
        WmsCapabilities::parse(&body)
            .with_context(|| format!("Invalid WMS capabilities from {}", url))
    }

    pub async fn describe_layers(
        &self,
        url: &str,
        layers: &[String],
    ) -> Result<Vec<LayerDescription>> {
        let names = layers.join(",");
        let request_url = build_url(
            url,
            &[("VERSION", DESCRIBE_LAYER_VERSION)],
            &[
                ("SERVICE", "WMS"),
                ("REQUEST", "DescribeLayer"),
                ("LAYERS", names.as_str()),
            ],
        )?;
        tracing::debug!("WMS DescribeLayer {}", request_url);
        let body = self.transport.get(&request_url).await?;
        parse_describe_layer(&body)
    }

    pub async fn describe_layer(&self, url: &str, layer: &str) -> Result<Option<LayerDescription>> {
        let descriptions = self.describe_layers(url, &[layer.to_string()]).await?;
        Ok(descriptions
            .into_iter()
            .find(|d| d.name.as_deref().map_or(true, |name| name == layer)))
    }

    async fn capabilities(&self, url: &str) -> Result<Arc<CapabilitiesDocument>> {
        if let Some(document) = self.cache.fresh(url) {
            if matches!(*document, CapabilitiesDocument::Wms(_)) {
                tracing::debug!("WMS capabilities cache hit for {}", url);
                return Ok(document);
            }
        }
        tracing::debug!("WMS capabilities cache miss for {}", url);
        let capabilities = self.get_capabilities(url).await?;
        Ok(self.cache.write(url, CapabilitiesDocument::Wms(capabilities)))
    }
}

#[async_trait]
impl CatalogAdapter for WmsAdapter {
    fn format(&self) -> Format {
        Format::Wms
    }

    async fn get_records(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        let document = self.capabilities(&query.url).await?;
        let CapabilitiesDocument::Wms(capabilities) = document.as_ref() else {
            bail!("Cached document for {} is not a WMS capabilities document", query.url);
        };

        let text = query.text.as_deref();
        let layers: Vec<&WmsLayer> = capabilities
            .flat_layers()
            .into_iter()
            .filter(|layer| matches_text(*layer, text))
            .collect();
        let page = paginate(&layers, query.start_position, query.max_records);

        Ok(SearchOutcome::Ok(SearchResult {
            number_of_records_matched: page.matched,
            number_of_records_returned: page.returned,
            next_record: page.next_record,
            records: page
                .items
                .into_iter()
                .map(|layer| Record::Wms(capabilities.record(layer)))
                .collect(),
            error: None,
        }))
    }
}
