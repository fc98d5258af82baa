use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of a single search filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Plain value, e.g. `data_wprow=1d`
    Scalar(String),
    /// `(from, to)` range where either bound may be left open
    Range { from: Option<String>, to: Option<String> },
}

impl FilterValue {
    pub fn scalar(value: impl ToString) -> Self {
        FilterValue::Scalar(value.to_string())
    }

    pub fn range<T: ToString>(from: Option<T>, to: Option<T>) -> Self {
        FilterValue::Range {
            from: from.map(|v| v.to_string()),
            to: to.map(|v| v.to_string()),
        }
    }
}

/// Search criteria for the catalog walker
///
/// Filter keys are passed to URL construction as-is, e.g. `cena[]` or
/// `l_pokoi[]`; nothing checks that the site knows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Category path segment, e.g. `nieruchomosci-mam-do-wynajecia`
    pub category: String,
    /// Region path segment, e.g. `gdansk`
    pub region: Option<String>,
    pub filters: BTreeMap<String, FilterValue>,
}

impl SearchQuery {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            region: None,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: FilterValue) -> Self {
        self.filters.insert(key.into(), value);
        self
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new("nieruchomosci-mam-do-wynajecia")
    }
}

/// Response handed back by a [`Fetcher`](super::traits::Fetcher)
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub content: String,
}

impl FetchedPage {
    pub fn new(url: impl Into<String>, status: u16, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            content: content.into(),
        }
    }

    /// Anything outside 2xx is unusable
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
