pub mod cache;
pub mod catalog;
pub mod http;
pub mod offer;
pub mod traits;
pub mod trojmiasto;
pub mod types;
pub mod urls;

pub use cache::CachingFetcher;
pub use http::HttpFetcher;
pub use traits::{Fetcher, ScraperTrait, UrlBuilder};
pub use trojmiasto::TrojmiastoScraper;
pub use types::{FetchedPage, FilterValue, SearchQuery};
pub use urls::TrojmiastoUrlBuilder;
