//! Session-scoped key-value storage.
//!
//! Values are stored as JSON text so that what comes back out has been
//! through the same encode/decode path a browser session store would use.
//! Entries expire after a period without access; nothing is durable.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Default idle expiry: 30 minutes.
const DEFAULT_IDLE: Duration = Duration::from_secs(30 * 60);

/// Error from storing a value.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to encode {key}: {message}")]
    Encode { key: String, message: String },
}

/// Configuration for the session store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Entries not read or written for this long are dropped.
    pub time_to_idle: Duration,
    /// Maximum number of stored entries.
    pub max_capacity: u64,
}

impl StorageConfig {
    pub fn with_time_to_idle(mut self, idle: Duration) -> Self {
        self.time_to_idle = idle;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            time_to_idle: DEFAULT_IDLE,
            max_capacity: 10_000,
        }
    }
}

/// In-memory JSON store.
#[derive(Clone)]
pub struct SessionStore {
    entries: MokaCache<String, String>,
}

impl SessionStore {
    pub fn new(config: &StorageConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_idle(config.time_to_idle)
            .max_capacity(config.max_capacity)
            .build();
        Self { entries }
    }

    /// Store `value` under `key`, replacing any previous value.
    pub async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|e| StorageError::Encode {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.entries.insert(key.to_string(), json).await;
        Ok(())
    }

    /// Load the value under `key`.
    ///
    /// Returns `fallback` if the key is missing or its contents don't
    /// decode as `T`.
    pub async fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let Some(json) = self.entries.get(key).await else {
            debug!(key, "no stored value");
            return fallback;
        };

        match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable stored value");
                fallback
            }
        }
    }

    /// Load the value under `key`, or `None`.
    ///
    /// Unreadable values are treated as missing.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.load(key, None).await
    }

    /// Store raw text under `key` without encoding.
    #[cfg(test)]
    async fn insert_raw(&self, key: &str, raw: &str) {
        self.entries.insert(key.to_string(), raw.to_string()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    use crate::domain::{Coordinate, RouteEstimate};
    use crate::planner::score;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        vehicle: String,
        stops: Vec<String>,
    }

    fn store() -> SessionStore {
        SessionStore::new(&StorageConfig::default())
    }

    #[tokio::test]
    async fn save_then_load() {
        let store = store();
        let prefs = Prefs {
            vehicle: "truck".into(),
            stops: vec!["Anakapalle".into()],
        };

        store.save("prefs", &prefs).await.unwrap();
        assert_eq!(store.load("prefs", Prefs::default()).await, prefs);
    }

    #[tokio::test]
    async fn missing_key_returns_fallback() {
        let store = store();
        let loaded: Vec<String> = store.load("nothing", vec!["x".to_string()]).await;
        assert_eq!(loaded, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn corrupt_value_returns_fallback() {
        let store = store();
        store.insert_raw("prefs", "{not json").await;
        assert_eq!(store.load("prefs", Prefs::default()).await, Prefs::default());

        store.insert_raw("prefs", r#"{"vehicle": 7}"#).await;
        assert_eq!(store.load("prefs", Prefs::default()).await, Prefs::default());
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let store = store();
        store.save("count", &3u32).await.unwrap();
        assert_eq!(store.get::<u32>("count").await, Some(3));
        assert_eq!(store.get::<u32>("other").await, None);
    }

    #[tokio::test]
    async fn stored_estimates_keep_exact_multipliers() {
        let store = store();
        let mut pairs = vec![(17.25, 82.5, 17.35, 82.6)];
        for i in 0..200 {
            let f = i as f64;
            pairs.push((-60.0 + f * 0.6, -170.0 + f * 1.7, 45.0 - f * 0.45, 120.0 - f * 1.3));
        }

        for (lat_a, lng_a, lat_b, lng_b) in pairs {
            let points = [
                Coordinate::new(lat_a, lng_a).unwrap(),
                Coordinate::new(lat_b, lng_b).unwrap(),
            ];
            let scored = score(&points).unwrap();
            store.save("estimates", &scored).await.unwrap();

            let loaded: [RouteEstimate; 3] = store.get("estimates").await.unwrap();
            assert_eq!(loaded, scored);

            let [shortest, traffic, eco] = loaded;
            assert_eq!(traffic.distance_km, 1.2 * shortest.distance_km);
            assert_eq!(eco.distance_km, 1.1 * shortest.distance_km);
        }
    }

    #[tokio::test]
    async fn save_replaces() {
        let store = store();
        store.save("k", &"first").await.unwrap();
        store.save("k", &"second").await.unwrap();
        assert_eq!(store.get::<String>("k").await.as_deref(), Some("second"));
    }

    #[test]
    fn default_config() {
        let config = StorageConfig::default();
        assert_eq!(config.time_to_idle, Duration::from_secs(1800));
        assert_eq!(config.max_capacity, 10_000);
    }
}
