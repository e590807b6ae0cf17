use anyhow::Result;
use async_trait::async_trait;

use crate::model::{Format, SearchOutcome, SearchQuery};

pub mod csw;
pub mod wms;
pub mod wmts;

/// Catalog adapter trait - implement for each protocol
#[async_trait]
pub trait CatalogAdapter: Send + Sync {
    /// Protocol this adapter answers for
    fn format(&self) -> Format;

    /// Search `query.url`, paginated by `query.start_position`/`query.max_records`
    async fn get_records(&self, query: &SearchQuery) -> Result<SearchOutcome>;

    /// Free-text search.
    /// The default implementation passes the text straight to `get_records`.
    async fn text_search(
        &self,
        url: &str,
        start_position: u32,
        max_records: u32,
        text: &str,
    ) -> Result<SearchOutcome> {
        let query =
            SearchQuery::new(self.format(), url, start_position, max_records).with_text(text);
        self.get_records(&query).await
    }
}

#[cfg(test)]
pub(crate) mod fixtures;
