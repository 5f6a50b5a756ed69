//! Caching layer for routed itineraries.
//!
//! The perturbation search asks for the same origin/destination pair many
//! times over a batch: the direct route is routed once for stop ranking and
//! again for the final path, and respondents sharing a residence share
//! every leg. Only found routes are cached; a failed lookup is always
//! retried against the server.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Coordinate, Itinerary, TravelMode};
use crate::planner::RouteProvider;

/// Cache key: exact bit patterns of origin and destination, plus mode.
type RouteKey = (u64, u64, u64, u64, TravelMode);

fn route_key(origin: &Coordinate, destination: &Coordinate, mode: TravelMode) -> RouteKey {
    (
        origin.lat().to_bits(),
        origin.lon().to_bits(),
        destination.lat().to_bits(),
        destination.lon().to_bits(),
        mode,
    )
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
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Route provider with caching.
///
/// Wraps any [`RouteProvider`] and remembers the itineraries it returns.
pub struct CachedRouter<P> {
    provider: P,
    routes: MokaCache<RouteKey, Itinerary>,
}

impl<P: RouteProvider> CachedRouter<P> {
    /// Create a new cached router.
    pub fn new(provider: P, config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { provider, routes }
    }

    /// Access the underlying provider for requests that bypass the cache.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.routes.invalidate_all();
    }
}

impl<P: RouteProvider> RouteProvider for CachedRouter<P> {
    async fn plan_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        mode: TravelMode,
    ) -> Option<Itinerary> {
        let key = route_key(origin, destination, mode);

        if let Some(cached) = self.routes.get(&key).await {
            return Some(cached);
        }

        let itinerary = self.provider.plan_route(origin, destination, mode).await?;
        self.routes.insert(key, itinerary.clone()).await;

        Some(itinerary)
    }
}
