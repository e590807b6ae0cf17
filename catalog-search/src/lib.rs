//! Search CSW, WMS and WMTS catalogs through one paginated record model.
//!
//! [`coordinator::CatalogSearch`] picks the protocol adapter for a
//! [`model::Format`]; WMS and WMTS capability documents are shared across
//! adapters through one [`cache::CapabilityCache`].

pub mod adapters;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod filter;
pub mod model;
pub mod paging;
pub mod transport;
pub mod url_builder;
pub mod xml;

pub use coordinator::{CatalogSearch, LayerEffect, LayerSearch, LayerSpec};
pub use model::{Format, Record, SearchOutcome, SearchQuery, SearchResult};
