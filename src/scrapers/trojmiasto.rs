use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::models::ListingRecord;
use crate::scrapers::cache::CachingFetcher;
use crate::scrapers::catalog::{page_count, parse_available_offers};
use crate::scrapers::http::HttpFetcher;
use crate::scrapers::offer::parse_offer;
use crate::scrapers::traits::{Fetcher, ScraperTrait, UrlBuilder};
use crate::scrapers::types::{FetchedPage, SearchQuery};
use crate::scrapers::urls::TrojmiastoUrlBuilder;
use crate::utils::{flatten, Nested};
use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// ogloszenia.trojmiasto.pl scraper
///
/// Fetches are strictly sequential: one page at a time, no retries.
pub struct TrojmiastoScraper {
    fetcher: Box<dyn Fetcher>,
    urls: Box<dyn UrlBuilder>,
}

impl TrojmiastoScraper {
    /// Scraper over `fetcher`, building URLs for the live site
    pub fn new(fetcher: impl Fetcher + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            urls: Box::new(TrojmiastoUrlBuilder::default()),
        }
    }

    /// HTTP scraper, cached when `config.cache` is set
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        let http = HttpFetcher::new(config)?;
        let urls = TrojmiastoUrlBuilder::new(config.base_url.clone());

        let scraper = match &config.cache {
            Some(cache) => {
                info!("Caching responses for {:?}", cache.ttl);
                Self::new(CachingFetcher::new(http, cache))
            }
            None => Self::new(http),
        };
        Ok(scraper.with_url_builder(urls))
    }

    pub fn with_url_builder(mut self, urls: impl UrlBuilder + 'static) -> Self {
        self.urls = Box::new(urls);
        self
    }

    async fn fetch_usable(&self, url: &str) -> Option<FetchedPage> {
        self.fetcher.fetch(url).await.filter(FetchedPage::is_success)
    }

    fn page_url(&self, query: &SearchQuery, page: Option<u32>) -> Result<String> {
        self.urls
            .build(&query.category, query.region.as_deref(), &query.filters, page)
    }

    /// Collect the URL of every listing matching `query`, in result order.
    ///
    /// Fails only when the first search page cannot be fetched. A later page
    /// that fails or has no listings ends the walk with what was collected so
    /// far. Listings repeated across pages are kept.
    pub async fn walk(&self, query: &SearchQuery) -> Result<Vec<String>> {
        let first_url = self.page_url(query, None)?;
        debug!("Fetching URL: {}", first_url);
        let first = self
            .fetch_usable(&first_url)
            .await
            .ok_or_else(|| ScrapeError::PageUnavailable {
                url: first_url.clone(),
            })?;

        let page_max = page_count(&first.content);
        info!("Search {} has {} page(s)", first_url, page_max);

        let mut first = Some(first);
        let mut parsed_urls: Vec<Nested<String>> = Vec::new();
        for page in 0..page_max {
            let response = match first.take() {
                Some(response) => response,
                None => match self.next_page(query, page).await {
                    Some(response) => response,
                    None => break,
                },
            };

            let offers = parse_available_offers(&response.content, &response.url);
            if offers.is_empty() {
                info!("No offers on page {}, stopping", page + 1);
                break;
            }
            info!("Loaded page {} of offers", page + 1);
            parsed_urls.push(offers.into());
        }

        let urls = flatten(parsed_urls);
        info!("Loaded {} offers", urls.len());
        Ok(urls)
    }

    async fn next_page(&self, query: &SearchQuery, page: u32) -> Option<FetchedPage> {
        let url = match self.page_url(query, Some(page)) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot build URL of page {}: {}", page + 1, e);
                return None;
            }
        };
        debug!("Fetching URL: {}", url);

        let response = self.fetch_usable(&url).await;
        if response.is_none() {
            warn!("Page {} ({}) unavailable, stopping", page + 1, url);
        }
        response
    }

    /// Fetch and extract one listing.
    ///
    /// `Ok(None)` means the listing was removed; an unreachable listing page
    /// is an error.
    pub async fn extract(&self, url: &str) -> Result<Option<ListingRecord>> {
        debug!("Fetching URL: {}", url);
        let page = self
            .fetch_usable(url)
            .await
            .ok_or_else(|| ScrapeError::PageUnavailable {
                url: url.to_string(),
            })?;

        Ok(parse_offer(&page.content, url))
    }

    /// Extract every listing in `urls`, keeping input order.
    ///
    /// Missing URLs, removed listings and unreachable pages are left out of
    /// the result rather than represented by placeholders.
    pub async fn extract_batch<I, S>(&self, urls: I) -> Vec<ListingRecord>
    where
        I: IntoIterator<Item = S>,
        S: Into<Option<String>>,
    {
        let mut records = Vec::new();

        for url in urls {
            let Some(url) = url.into() else {
                debug!("Skipping missing listing URL");
                continue;
            };

            match self.extract(&url).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => warn!("Skipping listing: {}", e),
            }
        }

        info!("Extracted {} listings", records.len());
        records
    }
}

#[async_trait]
impl ScraperTrait for TrojmiastoScraper {
    async fn scrape(&self, query: &SearchQuery) -> anyhow::Result<Vec<ListingRecord>> {
        info!("Starting trojmiasto.pl scrape for {}", query.category);

        let urls = self
            .walk(query)
            .await
            .context("Failed to walk search results")?;
        Ok(self.extract_batch(urls).await)
    }

    fn source_name(&self) -> &'static str {
        "trojmiasto.pl"
    }
}
