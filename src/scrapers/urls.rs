use crate::config::DEFAULT_BASE_URL;
use crate::error::{Result, ScrapeError};
use crate::scrapers::traits::UrlBuilder;
use crate::scrapers::types::FilterValue;
use std::collections::BTreeMap;
use url::Url;

/// Query parameter of every result page after the first: the first page has
/// none and `strona=1` is the second page
pub const PAGE_PARAM: &str = "strona";

/// Builds `{base}/{category}/{region}?{filters}&strona={page}` URLs
///
/// Range filters repeat their key once per bound, with an empty value for an
/// open bound: `cena[]=300&cena[]=`.
#[derive(Debug, Clone)]
pub struct TrojmiastoUrlBuilder {
    base_url: String,
}

impl TrojmiastoUrlBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for TrojmiastoUrlBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl UrlBuilder for TrojmiastoUrlBuilder {
    fn build(
        &self,
        category: &str,
        region: Option<&str>,
        filters: &BTreeMap<String, FilterValue>,
        page: Option<u32>,
    ) -> Result<String> {
        let invalid = |reason: &str| ScrapeError::InvalidUrl {
            url: self.base_url.clone(),
            reason: reason.to_string(),
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(&e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| invalid("base URL cannot have a path"))?;
            segments.pop_if_empty().push(category);
            if let Some(region) = region {
                segments.push(region);
            }
        }

        let mut pairs: Vec<(&str, String)> = Vec::new();
        for (key, value) in filters {
            match value {
                FilterValue::Scalar(v) => pairs.push((key.as_str(), v.clone())),
                FilterValue::Range { from, to } => {
                    pairs.push((key.as_str(), from.clone().unwrap_or_default()));
                    pairs.push((key.as_str(), to.clone().unwrap_or_default()));
                }
            }
        }
        if let Some(page) = page.filter(|p| *p > 0) {
            pairs.push((PAGE_PARAM, page.to_string()));
        }

        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url.to_string())
    }
}
