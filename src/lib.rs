//! Listing discovery and extraction for the ogloszenia.trojmiasto.pl
//! real-estate classifieds.
//!
//! [`TrojmiastoScraper::walk`] turns a [`SearchQuery`] into the URLs of all
//! matching listings; [`TrojmiastoScraper::extract_batch`] turns those URLs
//! into [`ListingRecord`]s, dropping listings that were taken down.

pub mod config;
pub mod error;
pub mod models;
pub mod scrapers;
pub mod utils;

pub use config::{CacheConfig, ScraperConfig};
pub use error::{Result, ScrapeError};
pub use models::{Additional, ListingRecord};
pub use scrapers::{
    CachingFetcher, FetchedPage, Fetcher, FilterValue, HttpFetcher, ScraperTrait, SearchQuery,
    TrojmiastoScraper, TrojmiastoUrlBuilder, UrlBuilder,
};
