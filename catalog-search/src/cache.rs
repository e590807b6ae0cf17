//! Time-to-live cache for parsed capabilities documents.
//!
//! Entries are keyed by the URL the caller searched. A re-fetch overwrites the
//! entry wholesale; nothing is ever purged, staleness is only judged on read.
//! Concurrent misses for one URL may both fetch, and the last write wins.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::adapters::wms::WmsCapabilities;
use crate::adapters::wmts::WmtsCapabilities;
use crate::config::CacheConfig;

/// Parsed document stored per URL.
#[derive(Debug)]
pub enum CapabilitiesDocument {
    Wms(WmsCapabilities),
    Wmts(WmtsCapabilities),
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fetched_at: DateTime<Utc>,
    pub data: Arc<CapabilitiesDocument>,
}

/// `now - fetched_at >= ttl`, compared in milliseconds.
pub fn is_expired_at(entry: &CacheEntry, ttl_seconds: u64, now: DateTime<Utc>) -> bool {
    let age_ms = (now - entry.fetched_at).num_milliseconds();
    age_ms >= (ttl_seconds as i64).saturating_mul(1000)
}

#[derive(Debug)]
pub struct CapabilityCache {
    ttl_seconds: u64,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CapabilityCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            ttl_seconds,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl_seconds)
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn read(&self, url: &str) -> Option<CacheEntry> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(url).cloned()
    }

    pub fn is_expired(&self, entry: &CacheEntry) -> bool {
        is_expired_at(entry, self.ttl_seconds, Utc::now())
    }

    /// Unexpired document for `url`, if any.
    pub fn fresh(&self, url: &str) -> Option<Arc<CapabilitiesDocument>> {
        self.read(url)
            .filter(|entry| !self.is_expired(entry))
            .map(|entry| entry.data)
    }

    /// Replaces any existing entry for `url`.
    pub fn write(&self, url: &str, data: CapabilitiesDocument) -> Arc<CapabilitiesDocument> {
        let data = Arc::new(data);
        self.insert(
            url,
            CacheEntry {
                fetched_at: Utc::now(),
                data: Arc::clone(&data),
            },
        );
        data
    }

    pub(crate) fn insert(&self, url: &str, entry: CacheEntry) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(url.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CapabilityCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}
