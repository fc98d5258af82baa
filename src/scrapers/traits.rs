use crate::error::Result;
use crate::models::ListingRecord;
use crate::scrapers::types::{FetchedPage, FilterValue, SearchQuery};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Common trait for all listing scrapers
#[async_trait]
pub trait ScraperTrait: Send + Sync {
    /// Discover and extract every listing matching `query`
    async fn scrape(&self, query: &SearchQuery) -> anyhow::Result<Vec<ListingRecord>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}

/// Page transport
///
/// Returns `None` on network failure or a non-2xx status. Implementations
/// must not retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<FetchedPage>;
}

/// Turns search criteria into a search page URL
pub trait UrlBuilder: Send + Sync {
    /// `page` of `None` (or `Some(0)`) is the first result page
    fn build(
        &self,
        category: &str,
        region: Option<&str>,
        filters: &BTreeMap<String, FilterValue>,
        page: Option<u32>,
    ) -> Result<String>;
}
