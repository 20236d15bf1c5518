//! Basic example demonstrating clima-cache with the memory backend

use clima_cache::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Quote {
    commodity: String,
    price: f64,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== clima-cache Basic Example ===\n");

    // Memory backend with its sweeper running
    let cache = ExpiringCache::in_memory(MemoryConfig::default())?;

    let quote = Quote {
        commodity: "soja".to_string(),
        price: 131.4,
    };

    // Market entries live 5 minutes unless told otherwise
    println!("Storing quote in cache...");
    cache.set("market:soja", &quote, CacheCategory::Market).await?;

    println!("Retrieving quote from cache...");
    match cache.get_entry::<Quote>("market:soja").await? {
        Some(entry) => {
            println!("Cache HIT: {} = {}", entry.value.commodity, entry.value.price);
            println!("   TTL remaining: {:?}", entry.ttl_remaining());
        }
        None => println!("Cache MISS"),
    }

    // Tuple keys are joined with ':'
    println!("\nUsing tuple keys...");
    cache
        .set(("session", "abc123"), &"user_data".to_string(), CacheOpts::new().category(CacheCategory::User))
        .await?;

    if cache.has("session:abc123").await? {
        println!("Session exists in cache");
    }

    // Explicit TTL overrides the category default
    cache
        .set(
            "weather-day:-23.55:-46.63:2024-01-15",
            &"day snapshot".to_string(),
            CacheOpts::new()
                .category(CacheCategory::Weather)
                .ttl(Duration::from_secs(20 * 60)),
        )
        .await?;

    let stats = cache.stats().await?;
    println!("\nCache Statistics:");
    println!("   Entries: {} ({} valid)", stats.total_entries, stats.valid_entries);
    for (category, count) in &stats.by_category {
        println!("   {}: {}", category, count);
    }
    println!("   Hit Ratio: {:.2}%", stats.hit_ratio() * 100.0);

    println!("\nDeleting quote...");
    let deleted = cache.delete("market:soja").await?;
    println!("   Deleted: {}", deleted);
    println!("   Exists after delete: {}", cache.has("market:soja").await?);

    println!("\n=== Example Complete ===");
    Ok(())
}
