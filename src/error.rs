//! Typed errors for the scraping library.

use thiserror::Error;

/// Errors surfaced by the walker and the single-listing extractor.
///
/// Field-level extraction faults never show up here: a missing element
/// degrades to `None` for that field.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// HTTP client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// A search or listing URL could not be built
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A page the operation depends on could not be fetched
    #[error("page unavailable: {url}")]
    PageUnavailable { url: String },
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
