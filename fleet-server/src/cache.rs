//! Caching layer for geocoding lookups.
//!
//! Place names typed on the planning form repeat a lot, and the public
//! geocoding service is rate limited. Only successful lookups are cached;
//! a miss is asked again next time.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::Place;
use crate::geocode::GeocodeError;
use crate::planner::Geocoder;

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
            max_capacity: 1000,
        }
    }
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

/// Geocoder with caching.
///
/// Keys are the trimmed, lower-cased query.
pub struct CachedGeocoder<G> {
    inner: G,
    places: MokaCache<String, Place>,
}

impl<G: Geocoder + Sync> CachedGeocoder<G> {
    /// Create a new cached geocoder.
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        let places = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, places }
    }

    /// Resolve a place name, using the cache if available.
    pub async fn resolve(&self, place_name: &str) -> Result<Place, GeocodeError> {
        let key = cache_key(place_name);
        if key.is_empty() {
            return Err(GeocodeError::InvalidQuery);
        }

        if let Some(cached) = self.places.get(&key).await {
            debug!(query = %key, "geocode cache hit");
            return Ok(cached);
        }

        let place = self.inner.resolve(place_name).await?;
        self.places.insert(key, place.clone()).await;
        Ok(place)
    }

    /// Access the underlying geocoder for lookups that bypass the cache.
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: Geocoder + Sync> Geocoder for CachedGeocoder<G> {
    async fn resolve(&self, place_name: &str) -> Result<Place, GeocodeError> {
        CachedGeocoder::resolve(self, place_name).await
    }
}

fn cache_key(place_name: &str) -> String {
    place_name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::Coordinate;

    /// Geocoder that knows one place and counts calls.
    #[derive(Default)]
    struct CountingGeocoder {
        calls: AtomicUsize,
    }

    impl Geocoder for CountingGeocoder {
        async fn resolve(&self, place_name: &str) -> Result<Place, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if place_name.trim().eq_ignore_ascii_case("vizag") {
                Ok(Place {
                    coordinate: Coordinate::new(17.68, 83.21).unwrap(),
                    display_name: "Visakhapatnam".to_string(),
                })
            } else {
                Err(GeocodeError::NotFound {
                    query: place_name.to_string(),
                })
            }
        }
    }

    fn cached() -> CachedGeocoder<CountingGeocoder> {
        CachedGeocoder::new(CountingGeocoder::default(), &CacheConfig::default())
    }

    #[tokio::test]
    async fn hit_skips_inner() {
        let geocoder = cached();

        let first = geocoder.resolve("Vizag").await.unwrap();
        let second = geocoder.resolve("  vizag ").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(geocoder.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn misses_are_not_cached() {
        let geocoder = cached();

        for _ in 0..2 {
            let err = geocoder.resolve("nowhere").await.unwrap_err();
            assert!(matches!(err, GeocodeError::NotFound { .. }));
        }
        assert_eq!(geocoder.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn blank_query_rejected() {
        let geocoder = cached();
        let err = geocoder.resolve("   ").await.unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidQuery));
        assert_eq!(geocoder.inner().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn expired_entry_is_refetched() {
        let config = CacheConfig::default().with_ttl(Duration::from_millis(100));
        let geocoder = CachedGeocoder::new(CountingGeocoder::default(), &config);

        geocoder.resolve("vizag").await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        geocoder.resolve("vizag").await.unwrap();
        assert_eq!(geocoder.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 1000);
    }
}
