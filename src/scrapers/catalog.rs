//! Search result page parsing: page count and listing links.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

static PAGINATION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".navi-pages").expect("valid selector"));
static LISTING_HEAD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".ogl-head").expect("valid selector"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid selector"));
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Number of result pages announced by the pagination widget.
///
/// The largest integer in the widget's text is the last page. Falls back to
/// `1` when the widget is missing or has no numbers.
pub fn page_count(markup: &str) -> u32 {
    let document = Html::parse_document(markup);
    let Some(widget) = document.select(&PAGINATION).next() else {
        warn!("No pagination on search page, assuming a single page");
        return 1;
    };

    let text = widget.text().collect::<String>();
    match NUMBER
        .find_iter(&text)
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .max()
    {
        Some(count) if count > 0 => count,
        _ => {
            warn!("Unparsable pagination {:?}, assuming a single page", text.trim());
            1
        }
    }
}

/// Link of a single listing header.
///
/// The header may itself be the anchor or wrap one. Relative links are
/// resolved against `base`.
pub fn parse_offer_url(header: ElementRef<'_>, base: Option<&Url>) -> Option<String> {
    let anchor = if header.value().name() == "a" {
        header
    } else {
        header.select(&ANCHOR).next()?
    };
    let href = anchor.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }

    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            base.and_then(|b| b.join(href).ok()).map(|u| u.to_string())
        }
        Err(_) => None,
    }
}

/// All listing links on a search page, in document order.
///
/// Headers whose link cannot be recovered are skipped.
pub fn parse_available_offers(markup: &str, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(markup);
    let base = Url::parse(page_url).ok();

    let mut urls = Vec::new();
    for (idx, header) in document.select(&LISTING_HEAD).enumerate() {
        match parse_offer_url(header, base.as_ref()) {
            Some(url) => urls.push(url),
            None => debug!("Skipped listing header {} on {}: no usable link", idx, page_url),
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://ogloszenia.trojmiasto.pl/nieruchomosci-mam-do-wynajecia/";

    #[test]
    fn page_count_takes_largest_number() {
        let markup = r#"<div class="navi-pages"><a>1</a> <a>2</a> <a>3</a> <span>...</span> <a>12</a> <a>następna</a></div>"#;
        assert_eq!(page_count(markup), 12);
    }

    #[test]
    fn page_count_defaults_to_one() {
        assert_eq!(page_count("<html><body><p>Brak wyników</p></body></html>"), 1);
        assert_eq!(page_count(r#"<div class="navi-pages">następna</div>"#), 1);
    }

    #[test]
    fn offers_are_listed_in_document_order() {
        let markup = r#"
            <div class="list">
              <div class="ogl-head"><a href="https://ogloszenia.trojmiasto.pl/a,ogl1.html">A</a></div>
              <div class="ogl-head"><a href="/b,ogl2.html">B</a></div>
              <a class="ogl-head" href="https://ogloszenia.trojmiasto.pl/c,ogl3.html">C</a>
            </div>"#;

        assert_eq!(
            parse_available_offers(markup, PAGE_URL),
            vec![
                "https://ogloszenia.trojmiasto.pl/a,ogl1.html",
                "https://ogloszenia.trojmiasto.pl/b,ogl2.html",
                "https://ogloszenia.trojmiasto.pl/c,ogl3.html",
            ]
        );
    }

    #[test]
    fn malformed_headers_are_skipped() {
        let markup = r#"
            <div class="ogl-head"><span>no link</span></div>
            <div class="ogl-head"><a>no href</a></div>
            <div class="ogl-head"><a href="https://ogloszenia.trojmiasto.pl/ok,ogl9.html">ok</a></div>"#;

        assert_eq!(
            parse_available_offers(markup, PAGE_URL),
            vec!["https://ogloszenia.trojmiasto.pl/ok,ogl9.html"]
        );
    }

    #[test]
    fn empty_page_has_no_offers() {
        assert!(parse_available_offers("<html></html>", PAGE_URL).is_empty());
    }
}
