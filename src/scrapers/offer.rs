//! Listing page extraction.
//!
//! Each field is read from its own region of the page and degrades to `None`
//! on its own when the markup is missing. Only a missing title rejects the
//! whole listing: the site keeps serving the URL of a removed listing, just
//! without its content.

use crate::models::{Additional, ListingRecord, DEFAULT_VOIVODESHIP};
use crate::utils::{normalize_whitespace, parse_digits, price_per_surface};
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

/// Inline script the site appends to listing descriptions
const SCRIPT_MARKER: &str = "$(function";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect("valid selector"));
    };
}

selector!(TITLE_REGION, ".title-wrap");
selector!(TITLE, "#ogl-title");
selector!(SIDEBAR, "#sidebar");
selector!(PRICE, ".font-4");
selector!(SUP, "sup");
selector!(VALUE, ".value");
selector!(ADDRESS, ".adres");
selector!(ANCHOR, "a");
selector!(ADDITIONAL, ".dodatkowe_informacje");
selector!(DESCRIPTION, ".ogl-description");
selector!(FANCYBOX, "a[rel=fancybox]");
selector!(GALLERY, ".ogl-gallery");
selector!(CONTACT, ".ogl-contact");
selector!(POSTER_NAME, ".name");
selector!(INFO, ".ogl-info-wrap");
selector!(LIST_ITEM, "li");

/// Extract a listing record from its page markup.
///
/// Returns `None` when the page has no title, i.e. the listing was removed.
pub fn parse_offer(markup: &str, url: &str) -> Option<ListingRecord> {
    let document = Html::parse_document(markup);

    let Some(title) = get_title(&document) else {
        warn!("Listing {} is not available anymore", url);
        return None;
    };
    debug!("Parsing listing {:?} at {}", title, url);

    let sidebar = document.select(&SIDEBAR).next();
    let field = |class: &str| sidebar.and_then(|s| field_text(s, class));
    let number = |class: &str| field(class).as_deref().and_then(parse_digits);

    let price = sidebar.and_then(get_price);
    let surface = sidebar.and_then(get_surface);
    let address = sidebar.and_then(get_address).unwrap_or_default();
    let info = document
        .select(&INFO)
        .next()
        .map(get_info)
        .unwrap_or_default();

    Some(ListingRecord {
        title,
        offer_id: info.offer_id,
        property_type: field("typ"),
        address: address.full,
        voivodeship: Some(DEFAULT_VOIVODESHIP.to_string()),
        city: address.city,
        district: address.district,
        price,
        deposit: number("kaucja"),
        price_per_surface: price_per_surface(price, surface),
        surface,
        floor: number("pietro"),
        floor_count: number("l_pieter"),
        rooms: number("l_pokoi"),
        built_date: number("rok_budowy"),
        available_from: field("dostepne_od"),
        furniture: sidebar.and_then(get_furniture),
        additional: get_additional(sidebar),
        poster_name: get_poster_name(&document),
        date_added: info.date_added,
        date_updated: info.date_updated,
        url: url.to_string(),
        description: get_description(&document),
        images: get_images(&document, url),
        scraped_at: Utc::now(),
    })
}

fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = normalize_whitespace(&element.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}

fn get_title(document: &Html) -> Option<String> {
    let region = document.select(&TITLE_REGION).next()?;
    element_text(region.select(&TITLE).next()?)
}

fn field_element<'a>(sidebar: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(&format!(".{}", class)).ok()?;
    sidebar.select(&selector).next()
}

/// Value of a labelled sidebar field: its `.value` child when it has one,
/// otherwise the whole field text.
fn field_text(sidebar: ElementRef<'_>, class: &str) -> Option<String> {
    let field = field_element(sidebar, class)?;
    match field.select(&VALUE).next() {
        Some(value) => element_text(value),
        None => element_text(field),
    }
}

/// `Some(false)` whenever the field exists without saying "tak", blank
/// value included; `None` only when there is no furniture field.
fn get_furniture(sidebar: ElementRef<'_>) -> Option<bool> {
    let field = field_element(sidebar, "umeblowane")?;
    let value = field.select(&VALUE).next().unwrap_or(field);
    Some(value.text().collect::<String>().to_lowercase().contains("tak"))
}

fn get_price(sidebar: ElementRef<'_>) -> Option<i64> {
    let price = sidebar.select(&PRICE).next()?;
    parse_digits(&price.text().collect::<String>())
}

/// Surface in m², read from the text right before the `<sup>` of "m²".
fn get_surface(sidebar: ElementRef<'_>) -> Option<f64> {
    let sup = sidebar.select(&SUP).next()?;

    let own = sup
        .prev_sibling()
        .and_then(|node| node.value().as_text().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty());
    let text = match own {
        Some(text) => text,
        None => sup
            .parent()?
            .prev_sibling()?
            .value()
            .as_text()
            .map(|t| t.trim().to_string())?,
    };

    parse_surface_text(&text)
}

/// Parse `"65 m2"`, `"42,5 m"` or `"120 m²"` into square meters.
pub fn parse_surface_text(text: &str) -> Option<f64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let number = compact
        .trim_end_matches("m2")
        .trim_end_matches("m²")
        .trim_end_matches('m')
        .replace(',', ".");
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Default)]
struct Address {
    full: Option<String>,
    city: Option<String>,
    district: Option<String>,
}

/// Address is `city[, district][, street]`. The second segment is a district
/// only when it links to the district page.
fn get_address(sidebar: ElementRef<'_>) -> Option<Address> {
    let region = sidebar.select(&ADDRESS).next()?;
    let scope = region.select(&VALUE).next().unwrap_or(region);

    let segments: Vec<ElementRef<'_>> = scope
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "span" && !e.value().classes().any(|c| c == "label"))
        .collect();

    if segments.is_empty() {
        return Some(Address {
            full: element_text(scope),
            ..Default::default()
        });
    }

    let city = element_text(segments[0]);
    let (district, street) = match segments.get(1) {
        Some(second) if second.select(&ANCHOR).next().is_some() => (
            element_text(*second),
            segments.get(2).and_then(|s| element_text(*s)),
        ),
        Some(second) => (None, element_text(*second)),
        None => (None, None),
    };

    let parts: Vec<&str> = [&city, &district, &street]
        .into_iter()
        .filter_map(|p| p.as_deref())
        .collect();
    let full = (!parts.is_empty()).then(|| parts.join(", "));

    Some(Address {
        full,
        city,
        district,
    })
}

/// Amenity keywords are plain substring checks, so "bez balkonu" still counts
/// as a balcony.
fn get_additional(sidebar: Option<ElementRef<'_>>) -> Additional {
    let text = sidebar
        .and_then(|s| s.select(&ADDITIONAL).next())
        .map(|block| block.text().collect::<String>().to_lowercase())
        .unwrap_or_default();
    let has = |keyword: &str| text.contains(keyword);

    Additional {
        balcony: has("balkon"),
        terrace: has("taras"),
        garden: has("ogród") || has("ogrod"),
        basement: has("piwnica"),
        elevator: has("winda"),
        garage: has("garaż") || has("garaz"),
        parking_space: has("parking"),
        air_conditioning: has("klimatyzacja"),
        intercom: has("domofon"),
        monitoring: has("monitoring"),
        heating: sidebar.and_then(|s| field_text(s, "ogrzewanie")),
    }
}

fn get_poster_name(document: &Html) -> Option<String> {
    let contact = document.select(&CONTACT).next()?;
    element_text(contact.select(&POSTER_NAME).next()?)
}

#[derive(Debug, Default)]
struct Info {
    offer_id: Option<String>,
    date_added: Option<String>,
    date_updated: Option<String>,
}

fn get_info(region: ElementRef<'_>) -> Info {
    let mut info = Info::default();

    for item in region.select(&LIST_ITEM) {
        let Some(text) = element_text(item) else {
            continue;
        };
        let label = text.to_lowercase();
        let value = match text.split_once(':') {
            Some((_, value)) => value.trim().to_string(),
            None => text.clone(),
        };
        if value.is_empty() {
            continue;
        }

        let slot = if label.contains("numer") {
            &mut info.offer_id
        } else if label.contains("aktualiz") {
            &mut info.date_updated
        } else if label.contains("wprowadz") || label.contains("dodan") {
            &mut info.date_added
        } else {
            continue;
        };
        slot.get_or_insert(value);
    }

    info
}

fn get_description(document: &Html) -> Option<String> {
    let region = document.select(&DESCRIPTION).next()?;
    let text = region.text().collect::<String>();
    let text = text.split(SCRIPT_MARKER).next().unwrap_or_default();
    let text = normalize_whitespace(text);
    (!text.is_empty()).then_some(text)
}

/// Lightbox links anywhere on the page; plain links of the gallery block when
/// the page has none.
fn get_images(document: &Html, page_url: &str) -> Vec<String> {
    let mut links: Vec<ElementRef<'_>> = document.select(&FANCYBOX).collect();
    if links.is_empty() {
        if let Some(gallery) = document.select(&GALLERY).next() {
            links = gallery.select(&ANCHOR).collect();
        }
    }
    let base = Url::parse(page_url).ok();

    links
        .into_iter()
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(|href| match base.as_ref().and_then(|b| b.join(href).ok()) {
            Some(resolved) => resolved.to_string(),
            None => href.to_string(),
        })
        .collect()
}
