use clima_cache::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cache = ExpiringCache::in_memory(MemoryConfig::default())?;

    // Counts how often the upstream is actually called
    let fetch_count = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    let key = "weather:-23.55:-46.63:24h";

    println!("Spawning 10 concurrent requests for key '{}'...", key);

    for _ in 0..10 {
        let cache = cache.clone();
        let fetch_count = fetch_count.clone();

        handles.push(tokio::spawn(async move {
            let result: Option<String> = cache
                .cached_fetch(key, CacheCategory::Weather, || async move {
                    // Simulate a slow upstream (100ms)
                    sleep(Duration::from_millis(100)).await;

                    let count = fetch_count.fetch_add(1, Ordering::SeqCst) + 1;
                    println!("Fetching... (count: {})", count);

                    Ok::<_, CacheError>(Some("24°C".to_string()))
                })
                .await?;

            Ok::<_, CacheError>(result)
        }));
    }

    for h in handles {
        let value = h.await??;
        assert_eq!(value.as_deref(), Some("24°C"));
    }

    let total = fetch_count.load(Ordering::SeqCst);
    println!("Total upstream calls: {}", total);

    if total != 1 {
        return Err(format!("expected 1 upstream call, got {}", total).into());
    }
    println!("SUCCESS: concurrent misses shared one fetch.");

    Ok(())
}
