use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://ogloszenia.trojmiasto.pl";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Response cache settings
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of cached pages
    pub max_capacity: u64,
    /// Time to live for a cached page
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 2_000,
            ttl: Duration::from_secs(600),
        }
    }
}

/// Runtime settings for the HTTP side of the scraper
#[derive(Debug, Clone, PartialEq)]
pub struct ScraperConfig {
    /// Site root, e.g. `https://ogloszenia.trojmiasto.pl`
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// `None` disables response caching
    pub cache: Option<CacheConfig>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            cache: Some(CacheConfig::default()),
        }
    }
}

impl ScraperConfig {
    /// Build a config from `TROJMIASTO_*` environment variables, falling back
    /// to defaults for anything unset or unparsable.
    ///
    /// `TROJMIASTO_CACHE_TTL_SECS=0` turns the cache off.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base_url) = lookup("TROJMIASTO_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(user_agent) = lookup("TROJMIASTO_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "TROJMIASTO_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(secs);
        }

        let ttl = parse_var::<u64>(&lookup, "TROJMIASTO_CACHE_TTL_SECS");
        let capacity = parse_var::<u64>(&lookup, "TROJMIASTO_CACHE_CAPACITY");
        config.cache = match ttl {
            Some(0) => None,
            _ => {
                let mut cache = CacheConfig::default();
                if let Some(secs) = ttl {
                    cache.ttl = Duration::from_secs(secs);
                }
                if let Some(capacity) = capacity {
                    cache.max_capacity = capacity;
                }
                Some(cache)
            }
        };

        config
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a number", key, raw);
            None
        }
    }
}
