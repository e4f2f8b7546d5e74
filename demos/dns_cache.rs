//! DNS lookup cache demo
//!
//! Caches simulated resolver answers, shows reads refreshing entries, stale
//! answers disappearing and the background sweep reclaiming memory.
//!
//! Run with `cargo run --example dns_cache`. Logging honours `RUST_LOG` and
//! `TTL_CACHE_MIN_SWEEP_INTERVAL_MS` adjusts the sweep floor.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::{CacheConfig, TtlCache};

/// Stand-in for a real resolver.
fn resolve(host: &str) -> IpAddr {
    let octet = host.bytes().fold(0u8, |acc, b| acc.wrapping_add(b));
    IpAddr::V4(Ipv4Addr::new(10, 0, 0, octet))
}

/// Returns the cached answer, resolving and caching on a miss.
fn lookup(cache: &TtlCache<IpAddr>, host: &str) -> IpAddr {
    if let Some(addr) = cache.read(host) {
        info!(host, %addr, "cache hit");
        return addr;
    }

    let addr = resolve(host);
    info!(host, %addr, "cache miss, resolved");
    cache.set(host, addr);
    addr
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=debug,dns_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env().with_default_ttl(Duration::from_secs(2));
    let cache = TtlCache::try_from_config(&config)?;
    info!(
        "Cache ready: default_ttl={:?}, sweep_interval={:?}",
        cache.default_ttl(),
        cache.sweep_interval()
    );

    lookup(&cache, "example.com");
    lookup(&cache, "example.com");

    // A negative answer that should only be trusted briefly
    cache.set_with_ttl(
        "nxdomain.test",
        IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        Duration::from_millis(300),
    );
    info!("Entries after inserts: {}", cache.count());

    tokio::time::sleep(Duration::from_millis(500)).await;
    info!(
        "nxdomain.test visible: {}, entries still held: {}",
        cache.contains_key("nxdomain.test"),
        cache.count()
    );

    tokio::time::sleep(Duration::from_secs(3)).await;
    lookup(&cache, "example.com");

    let stats = cache.stats();
    info!(
        "Stats: hits={}, misses={}, purged={}, entries={}, hit_rate={:.2}",
        stats.hits,
        stats.misses,
        stats.purged,
        stats.total_entries,
        stats.hit_rate()
    );

    cache.shutdown().await?;
    Ok(())
}
