//! Entry point used by callers: format dispatch and the add-and-describe
//! layer workflow.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::adapters::csw::CswAdapter;
use crate::adapters::wms::WmsAdapter;
use crate::adapters::wmts::WmtsAdapter;
use crate::adapters::CatalogAdapter;
use crate::cache::CapabilityCache;
use crate::config::Config;
use crate::model::{Format, SearchOutcome, SearchQuery};
use crate::transport::{HttpTransport, Transport};

/// Search endpoint attached to a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSearch {
    pub url: String,
    #[serde(rename = "type")]
    pub service_type: String,
}

/// Layer as handed to the map by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    #[serde(rename = "type")]
    pub layer_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<LayerSearch>,
}

/// Changes the caller applies to its layer set, in the order received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "lowercase")]
pub enum LayerEffect {
    Add(LayerSpec),
    Update { id: String, search: LayerSearch },
}

/// `{name}__{n}`, with `n` starting at the size of the current layer set and
/// bumped until no existing id matches.
pub fn unique_layer_id(name: &str, existing_ids: &[String]) -> String {
    let mut n = existing_ids.len();
    loop {
        let candidate = format!("{}__{}", name, n);
        if !existing_ids.iter().any(|id| id == &candidate) {
            return candidate;
        }
        n += 1;
    }
}

pub struct CatalogSearch {
    adapters: HashMap<Format, Arc<dyn CatalogAdapter>>,
    wms: Arc<WmsAdapter>,
}

impl CatalogSearch {
    /// Registers one adapter per format, all sharing `cache`.
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<CapabilityCache>) -> Self {
        let wms = Arc::new(WmsAdapter::new(transport.clone(), cache.clone()));
        let mut adapters: HashMap<Format, Arc<dyn CatalogAdapter>> = HashMap::new();
        adapters.insert(Format::Csw, Arc::new(CswAdapter::new(transport.clone())));
        adapters.insert(Format::Wms, wms.clone());
        adapters.insert(Format::Wmts, Arc::new(WmtsAdapter::new(transport, cache)));
        Self { adapters, wms }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.http)?;
        let cache = CapabilityCache::from_config(&config.cache);
        Ok(Self::new(Arc::new(transport), Arc::new(cache)))
    }

    pub fn adapter(&self, format: Format) -> Result<Arc<dyn CatalogAdapter>> {
        match self.adapters.get(&format) {
            Some(adapter) => Ok(adapter.clone()),
            None => bail!("No catalog adapter registered for format {}", format),
        }
    }

    pub fn wms(&self) -> &WmsAdapter {
        &self.wms
    }

    pub async fn get_records(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        let adapter = self.adapter(query.format)?;
        tracing::info!(
            "Searching {} catalog {} (start {}, max {})",
            query.format,
            query.url,
            query.start_position,
            query.max_records
        );
        let outcome = adapter
            .get_records(query)
            .await
            .with_context(|| format!("{} search of {} failed", query.format, query.url))?;
        if let Some(message) = outcome.error() {
            tracing::warn!("{} catalog {} reported: {}", query.format, query.url, message);
        }
        Ok(outcome)
    }

    pub async fn text_search(
        &self,
        format: Format,
        url: &str,
        start_position: u32,
        max_records: u32,
        text: &str,
    ) -> Result<SearchOutcome> {
        let adapter = self.adapter(format)?;
        adapter
            .text_search(url, start_position, max_records, text)
            .await
            .with_context(|| format!("{} text search of {} failed", format, url))
    }

    /// Emits [`LayerEffect::Add`] before returning. For WMS layers a
    /// DescribeLayer request is spawned; when it reports a WFS service for
    /// the same layer name a [`LayerEffect::Update`] follows. Describe
    /// failures are logged and dropped.
    pub fn add_layer_and_describe(
        &self,
        mut layer: LayerSpec,
        existing_ids: &[String],
        effects: &UnboundedSender<LayerEffect>,
    ) -> Result<Option<JoinHandle<()>>> {
        let id = unique_layer_id(&layer.name, existing_ids);
        layer.id = Some(id.clone());
        effects
            .send(LayerEffect::Add(layer.clone()))
            .context("Layer effect receiver closed")?;

        if !layer.layer_type.eq_ignore_ascii_case("wms") {
            return Ok(None);
        }

        let wms = self.wms.clone();
        let effects = effects.clone();
        Ok(Some(tokio::spawn(async move {
            let descriptions = match wms
                .describe_layers(&layer.url, std::slice::from_ref(&layer.name))
                .await
            {
                Ok(descriptions) => descriptions,
                Err(e) => {
                    tracing::debug!("DescribeLayer for {} failed: {:#}", layer.name, e);
                    return;
                }
            };

            let wfs_url = descriptions
                .into_iter()
                .find(|d| d.name.as_deref() == Some(layer.name.as_str()) && d.is_wfs())
                .and_then(|d| d.ows_url);
            let Some(url) = wfs_url else {
                tracing::debug!("No WFS service described for layer {}", layer.name);
                return;
            };

            let update = LayerEffect::Update {
                id,
                search: LayerSearch {
                    url,
                    service_type: "wfs".to_string(),
                },
            };
            if effects.send(update).is_err() {
                tracing::debug!("Layer effect receiver closed before update of {}", layer.name);
            }
        })))
    }
}
