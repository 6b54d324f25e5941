use std::sync::Arc;

use listing_scout::{AreaDirectory, Session, StorageFetcher};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 Listing Scout - Dubai Property Catalog");
    info!("=========================================");

    let base_url = std::env::var("STORAGE_URL")
        .unwrap_or_else(|_| "https://placeholder.supabase.co".to_string());
    let bucket =
        std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "real-estate-data".to_string());

    let fetcher = Arc::new(StorageFetcher::new(&base_url, &bucket)?);
    let mut session = Session::new(AreaDirectory::dubai(), fetcher);

    let query: String = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let query = if query.is_empty() {
        "3 bedroom apartment in dubai marina".to_string()
    } else {
        query
    };

    info!("Running query: {}", query);
    if let Err(err) = session.search(&query).await {
        // foreground failures name the area; keep going so the summary
        // still shows whatever the sweep managed to load
        info!("Search failed: {:#}", err);
    }

    let results = session.results();
    info!("✅ {} matching listings", results.len());

    for (i, listing) in results.iter().enumerate() {
        println!("{}. {} ({})", i + 1, listing.title, listing.price);
        println!("   {} · {}", listing.location, listing.property_type);
        println!("   {} beds, posted {}", listing.bedroom_count, listing.posted_date);
        println!("   {}", listing.link);
        println!();
    }

    let summary = session.summary();
    info!(
        "Areas loaded: {}/{}, listings: {}",
        summary.loaded_areas, summary.total_areas, summary.total_listings
    );

    Ok(())
}
