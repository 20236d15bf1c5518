use clima_cache::prelude::*;
use clima_cache::TracingMetrics;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE) // TRACE shows latency events
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let backend = MemoryBackend::new(MemoryConfig::default());
    let metrics = TracingMetrics::new().with_service_name("clima-example");

    let cache = ExpiringCache::with_serializer_and_metrics(
        backend,
        JsonSerializer,
        metrics,
        ExpiringCacheConfig::with_namespace("clima"),
    )
    .start_sweeper()?;

    println!("Setting value...");
    cache
        .set("location:são paulo", &"-23.55,-46.63", CacheCategory::Location)
        .await?;

    println!("Getting value (hit)...");
    let hit = cache.get::<String>("location:são paulo").await?;
    println!("   Got: {:?}", hit);

    println!("Getting missing value (miss)...");
    let miss = cache.get::<String>("location:recife").await?;
    println!("   Got: {:?}", miss);

    println!("Cleanup evicted {} entries", cache.cleanup().await?);

    Ok(())
}
