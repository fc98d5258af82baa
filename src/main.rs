use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trojmiasto_scout::{ScraperConfig, ScraperTrait, SearchQuery, TrojmiastoScraper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // trojmiasto-scout [category] [region]
    let mut args = std::env::args().skip(1);
    let mut query = match args.next() {
        Some(category) => SearchQuery::new(category),
        None => SearchQuery::default(),
    };
    if let Some(region) = args.next() {
        query = query.with_region(region);
    }

    let config = ScraperConfig::from_env();
    let scraper = TrojmiastoScraper::from_config(&config).context("Failed to create scraper")?;

    info!(
        "Scraping {} from {} ({})",
        query.category,
        scraper.source_name(),
        query.region.as_deref().unwrap_or("all regions")
    );

    let listings = scraper.scrape(&query).await?;

    info!("Scraped {} listings", listings.len());

    for (i, listing) in listings.iter().enumerate() {
        let price = listing
            .price
            .map(|p| format!("{} zł", p))
            .unwrap_or_else(|| "no price".to_string());
        println!("{}. {} ({})", i + 1, listing.title, price);
        if let Some(surface) = listing.surface {
            print!("   {} m²", surface);
            if let Some(rooms) = listing.rooms {
                print!(", {} rooms", rooms);
            }
            println!();
        }
        if let Some(address) = &listing.address {
            println!("   Address: {}", address);
        }
        println!("   URL: {}", listing.url);
        println!();
    }

    let json = serde_json::to_string_pretty(&listings)?;
    tokio::fs::write("scraped_listings.json", json)
        .await
        .context("Failed to write scraped_listings.json")?;
    info!("Saved all listings to scraped_listings.json");

    Ok(())
}
