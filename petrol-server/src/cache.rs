//! Caching layer for query responses.
//!
//! Responses are keyed by the station list generation plus every field of
//! the request, so a refresh of the station list never serves stale pages:
//! new generations simply miss. The TTL only bounds memory.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{FuelType, SortKey};
use crate::query::QueryRequest;

/// Cache key: the station list generation and the full request.
///
/// Price bounds are held as their bit patterns and the user location as
/// fixed-point ten-thousandths of a degree, so the key is `Eq + Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    generation: u64,
    search: String,
    fuel_type: Option<FuelType>,
    brand: Option<String>,
    region: Option<String>,
    min_price: Option<u64>,
    max_price: Option<u64>,
    sort_by: SortKey,
    page: usize,
    page_size: usize,
    location: Option<(i64, i64)>,
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            max_capacity: 1000,
        }
    }
}

/// Build the cache key for a request.
///
/// The user location is rounded to 4 decimal places (about 11 m) to bound
/// cardinality when clients send jittery GPS fixes.
pub fn query_key(generation: u64, request: &QueryRequest) -> QueryKey {
    let filter = &request.filter;
    let fixed = |degrees: f64| (degrees * 10_000.0).round() as i64;

    QueryKey {
        generation,
        search: filter.search.clone(),
        fuel_type: filter.fuel_type.clone(),
        brand: filter.brand.clone(),
        region: filter.region.clone(),
        min_price: filter.price_range.min.map(f64::to_bits),
        max_price: filter.price_range.max.map(f64::to_bits),
        sort_by: filter.sort_by,
        page: request.page,
        page_size: request.page_size,
        location: request
            .user_location
            .map(|c| (fixed(c.latitude()), fixed(c.longitude()))),
    }
}

/// Cache of rendered query responses.
pub struct QueryCache<V> {
    pages: MokaCache<QueryKey, Arc<V>>,
}

impl<V> QueryCache<V>
where
    V: Send + Sync + 'static,
{
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let pages = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { pages }
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// Concurrent misses on the same key run `compute` once.
    pub async fn get_or_compute<F>(&self, key: QueryKey, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        self.pages
            .get_with(key, async move { Arc::new(compute()) })
            .await
    }

    /// Number of cached pages (reported by `/api/stats`).
    pub fn entry_count(&self) -> u64 {
        self.pages.entry_count()
    }
}
