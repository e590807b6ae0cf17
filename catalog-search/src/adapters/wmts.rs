//! WMTS adapter: searches the `Contents` layers of a capabilities document.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use roxmltree::Node;
use std::sync::Arc;

use super::csw::exception_message;
use super::CatalogAdapter;
use crate::cache::{CapabilitiesDocument, CapabilityCache};
use crate::model::{
    normalize_crs_urn, BoundingBox, Format, Record, SearchOutcome, SearchQuery, SearchResult,
    WmtsRecord, DEFAULT_CRS,
};
use crate::paging::{flatten_layers, matches_text, paginate, LayerNode};
use crate::transport::Transport;
use crate::url_builder::capabilities_url;
use crate::xml;

pub const CAPABILITIES_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WmtsLayer {
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub bounding_box: Option<BoundingBox>,
    pub formats: Vec<String>,
    pub tile_matrix_sets: Vec<String>,
    pub layers: Vec<WmtsLayer>,
}

impl LayerNode for WmtsLayer {
    fn identity(&self) -> Option<&str> {
        self.identifier.as_deref()
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

#[derive(Debug, Clone, PartialEq)]
pub struct TileMatrixSet {
    pub identifier: String,
    /// Already normalized to `EPSG:` form.
    pub crs: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WmtsCapabilities {
    pub version: Option<String>,
    pub layers: Vec<WmtsLayer>,
    pub tile_matrix_sets: Vec<TileMatrixSet>,
    /// KVP endpoint of the `GetTile` operation.
    pub get_tile_url: Option<String>,
}

impl WmtsCapabilities {
    pub fn parse(body: &str) -> Result<Self> {
        let doc = xml::parse(body).context("Failed to parse WMTS capabilities")?;
        let root = doc.root_element();
        if let Some(message) = exception_message(root) {
            bail!("WMTS service exception: {}", message);
        }
        if xml::local_name(root) != "Capabilities" {
            bail!("Not a WMTS capabilities document: <{}>", xml::local_name(root));
        }
        let contents = xml::child(root, "Contents").context("WMTS capabilities without Contents")?;

        let tile_matrix_sets = xml::children(contents, "TileMatrixSet")
            .filter_map(|node| {
                Some(TileMatrixSet {
                    identifier: xml::child_text(node, "Identifier")?,
                    crs: normalize_crs_urn(&xml::child_text(node, "SupportedCRS")?),
                })
            })
            .collect();

        Ok(Self {
            version: xml::attr(root, "version").map(str::to_string),
            layers: xml::children(contents, "Layer").map(parse_layer).collect(),
            tile_matrix_sets,
            get_tile_url: xml::child(root, "OperationsMetadata").and_then(kvp_get_tile_url),
        })
    }

    pub fn flat_layers(&self) -> Vec<&WmtsLayer> {
        flatten_layers(&self.layers)
    }

    /// CRS of every set the layer links to. A layer without links offers
    /// all sets of the document.
    pub fn layer_crs(&self, layer: &WmtsLayer) -> Vec<String> {
        let mut crs: Vec<String> = Vec::new();
        let linked = self.tile_matrix_sets.iter().filter(|set| {
            layer.tile_matrix_sets.is_empty() || layer.tile_matrix_sets.contains(&set.identifier)
        });
        for set in linked {
            if !crs.contains(&set.crs) {
                crs.push(set.crs.clone());
            }
        }
        crs
    }

    fn record(&self, layer: &WmtsLayer) -> WmtsRecord {
        WmtsRecord {
            identifier: layer.identifier.clone().unwrap_or_default(),
            title: layer.title.clone(),
            abstract_text: layer.abstract_text.clone(),
            bounding_box: layer.bounding_box.clone(),
            srs: self.layer_crs(layer),
            tile_matrix_sets: layer.tile_matrix_sets.clone(),
            formats: layer.formats.clone(),
            get_tile_url: self.get_tile_url.clone(),
        }
    }
}

fn parse_layer(node: Node<'_, '_>) -> WmtsLayer {
    WmtsLayer {
        identifier: xml::child_text(node, "Identifier"),
        title: xml::child_text(node, "Title"),
        abstract_text: xml::child_text(node, "Abstract"),
        bounding_box: wgs84_bounding_box(node),
        formats: xml::children(node, "Format").filter_map(xml::text).collect(),
        tile_matrix_sets: xml::children(node, "TileMatrixSetLink")
            .filter_map(|link| xml::child_text(link, "TileMatrixSet"))
            .collect(),
        layers: xml::children(node, "Layer").map(parse_layer).collect(),
    }
}

fn wgs84_bounding_box(node: Node<'_, '_>) -> Option<BoundingBox> {
    let bbox = xml::child(node, "WGS84BoundingBox")?;
    let (min_x, min_y) =
        xml::child_text(bbox, "LowerCorner").and_then(|v| xml::parse_corner(&v))?;
    let (max_x, max_y) =
        xml::child_text(bbox, "UpperCorner").and_then(|v| xml::parse_corner(&v))?;
    Some(BoundingBox {
        extent: [min_x, min_y, max_x, max_y],
        crs: DEFAULT_CRS.to_string(),
    })
}

/// First `GetTile` HTTP Get whose encoding constraint allows KVP.
fn kvp_get_tile_url(operations: Node<'_, '_>) -> Option<String> {
    let operation = xml::children(operations, "Operation")
        .find(|op| xml::attr(*op, "name") == Some("GetTile"))?;
    operation
        .descendants()
        .filter(|n| xml::is_element(*n, "Get"))
        .find(|get| {
            get.descendants()
                .filter(|n| xml::is_element(*n, "Value"))
                .filter_map(xml::text)
                .any(|value| value.eq_ignore_ascii_case("KVP"))
        })
        .and_then(|get| xml::attr(get, "href"))
        .map(str::to_string)
}

pub struct WmtsAdapter {
    transport: Arc<dyn Transport>,
    cache: Arc<CapabilityCache>,
}

impl WmtsAdapter {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<CapabilityCache>) -> Self {
        Self { transport, cache }
    }

    pub async fn get_capabilities(&self, url: &str) -> Result<WmtsCapabilities> {
        let request_url = capabilities_url(url, "WMTS", CAPABILITIES_VERSION)?;
        tracing::debug!("WMTS GetCapabilities {}", request_url);
        let body = self.transport.get(&request_url).await?;
        WmtsCapabilities::parse(&body)
            .with_context(|| format!("Invalid WMTS capabilities from {}", url))
    }

    async fn capabilities(&self, url: &str) -> Result<Arc<CapabilitiesDocument>> {
        if let Some(document) = self.cache.fresh(url) {
            if matches!(*document, CapabilitiesDocument::Wmts(_)) {
                tracing::debug!("WMTS capabilities cache hit for {}", url);
                return Ok(document);
            }
        }
        let capabilities = self.get_capabilities(url).await?;
        Ok(self.cache.write(url, CapabilitiesDocument::Wmts(capabilities)))
    }
}

#[async_trait]
impl CatalogAdapter for WmtsAdapter {
    fn format(&self) -> Format {
        Format::Wmts
    }

    async fn get_records(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        let document = self.capabilities(&query.url).await?;
        let CapabilitiesDocument::Wmts(capabilities) = document.as_ref() else {
            bail!("Cached document for {} is not a WMTS capabilities document", query.url);
        };

        let text = query.text.as_deref();
        let layers: Vec<&WmtsLayer> = capabilities
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
                .map(|layer| Record::Wmts(capabilities.record(layer)))
                .collect(),
            error: None,
        }))
    }
}
