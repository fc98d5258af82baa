//! Response cache in front of any [`Fetcher`].
//!
//! Only usable pages are stored, so a failed fetch is attempted again on the
//! next call instead of being remembered.

use crate::config::CacheConfig;
use crate::scrapers::traits::Fetcher;
use crate::scrapers::types::FetchedPage;
use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

pub struct CachingFetcher<F> {
    inner: F,
    cache: Cache<String, FetchedPage>,
}

impl<F: Fetcher> CachingFetcher<F> {
    pub fn new(inner: F, config: &CacheConfig) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(config.max_capacity)
                .time_to_live(config.ttl)
                .build(),
        }
    }

    /// Drop every cached page
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for CachingFetcher<F> {
    async fn fetch(&self, url: &str) -> Option<FetchedPage> {
        if let Some(page) = self.cache.get(url).await {
            debug!("Cache hit for {}", url);
            return Some(page);
        }

        let page = self.inner.fetch(url).await?;
        if page.is_success() {
            self.cache.insert(url.to_string(), page.clone()).await;
        }
        Some(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Serves a fixed status and counts calls
    struct CountingFetcher {
        status: u16,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> Option<FetchedPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.status {
                0 => None,
                status => Some(FetchedPage::new(url, status, "<html></html>")),
            }
        }
    }

    fn caching(status: u16) -> (CachingFetcher<CountingFetcher>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = CountingFetcher {
            status,
            calls: Arc::clone(&calls),
        };
        let config = CacheConfig {
            max_capacity: 10,
            ttl: Duration::from_secs(60),
        };
        (CachingFetcher::new(inner, &config), calls)
    }

    #[tokio::test]
    async fn repeated_fetch_hits_cache() {
        let (fetcher, calls) = caching(200);

        assert!(fetcher.fetch("https://a/1").await.is_some());
        assert!(fetcher.fetch("https://a/1").await.is_some());
        assert!(fetcher.fetch("https://a/2").await.is_some());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (fetcher, calls) = caching(0);

        assert!(fetcher.fetch("https://a/1").await.is_none());
        assert!(fetcher.fetch("https://a/1").await.is_none());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unusable_status_is_passed_through_uncached() {
        let (fetcher, calls) = caching(500);

        let page = fetcher.fetch("https://a/1").await.unwrap();
        assert!(!page.is_success());
        fetcher.fetch("https://a/1").await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let (fetcher, calls) = caching(200);

        fetcher.fetch("https://a/1").await;
        fetcher.invalidate_all();
        fetcher.fetch("https://a/1").await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
