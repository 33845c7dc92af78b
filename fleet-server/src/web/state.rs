//! Application state for the web layer.

use std::sync::Arc;

use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;
use tracing::info;

use crate::cache::CachedGeocoder;
use crate::config::AppConfig;
use crate::geocode::{GeocodeError, GeocoderClient, StaticGeocoder};
use crate::osrm::{OsrmClient, RoutingError};
use crate::planner::{FallbackRouter, GeocoderBackend, RouteScorer, StraightLineRouter, TripPlanner};
use crate::simulator::{SimulationConfig, SimulationSnapshot, Tracker};
use crate::storage::{SessionStore, StorageConfig};

/// Planner over the configured geocoder and routing client.
pub type AppPlanner = TripPlanner<CachedGeocoder<GeocoderBackend>, FallbackRouter<OsrmClient>>;

/// Error while assembling the application from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("geocoder: {0}")]
    Geocoder(#[from] GeocodeError),

    #[error("routing client: {0}")]
    Routing(#[from] RoutingError),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Trip planner
    pub planner: Arc<AppPlanner>,

    /// Planned trips, keyed by `trip:{id}`
    pub sessions: Arc<SessionStore>,

    /// Live tracking, one tracker per trip id. Expires on the same idle
    /// period as sessions; an evicted tracker cancels its task on drop.
    pub tracking: MokaCache<String, Arc<Mutex<Tracker>>>,

    /// Tick period and stride for new trackers
    pub simulation: SimulationConfig,
}

impl AppState {
    /// Create a new app state.
    pub fn new(planner: AppPlanner, storage: &StorageConfig, simulation: SimulationConfig) -> Self {
        let tracking = MokaCache::builder()
            .time_to_idle(storage.time_to_idle)
            .max_capacity(storage.max_capacity)
            .build();

        Self {
            planner: Arc::new(planner),
            sessions: Arc::new(SessionStore::new(storage)),
            tracking,
            simulation,
        }
    }

    /// Tracker for `trip_id`, created idle if absent.
    pub async fn tracker(&self, trip_id: &str) -> Arc<Mutex<Tracker>> {
        let simulation = self.simulation;
        self.tracking
            .get_with(trip_id.to_string(), async move {
                Arc::new(Mutex::new(Tracker::new(simulation)))
            })
            .await
    }

    /// Remove the tracker for `trip_id` and wait for its task to stop.
    ///
    /// Returns the last snapshot if a task was loaded.
    pub async fn stop_tracking(&self, trip_id: &str) -> Option<SimulationSnapshot> {
        let tracker = self.tracking.remove(trip_id).await?;
        let handle = tracker.lock().await.take()?;
        Some(handle.stop().await)
    }

    /// Build clients and planner from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let backend = match &config.places_file {
            Some(path) => {
                let places = StaticGeocoder::from_file(path)?;
                info!(path = %path.display(), places = places.len(), "using offline places file");
                GeocoderBackend::Static(places)
            }
            None => GeocoderBackend::Nominatim(GeocoderClient::new(config.geocoder.clone())?),
        };
        let geocoder = CachedGeocoder::new(backend, &config.cache);

        let fallback = config.planner.straight_line_fallback.then(|| {
            StraightLineRouter::new(
                config.planner.fallback_points,
                config.planner.fallback_speed_kmh,
            )
        });
        let paths = FallbackRouter::new(OsrmClient::new(config.osrm.clone())?, fallback);

        let planner = TripPlanner::new(
            geocoder,
            paths,
            RouteScorer::new(config.planner.waypoint_mode),
        );

        Ok(Self::new(planner, &config.storage, config.simulation))
    }
}

/// Storage key for a trip session.
pub(crate) fn session_key(trip_id: &str) -> String {
    format!("trip:{trip_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::planner::WaypointMode;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned()).unwrap()
    }

    #[tokio::test]
    async fn offline_places_file() {
        let config = config(&[
            ("FLEET_PLACES_FILE", "data/places.json"),
            ("FLEET_WAYPOINTS", "all_stops"),
        ]);
        let state = AppState::from_config(&config).unwrap();

        assert_eq!(state.planner.scorer().mode(), WaypointMode::AllStops);
        let place = state.planner.geocoder().resolve("Visakhapatnam").await.unwrap();
        assert!((place.coordinate.lat() - 17.68).abs() < 0.1);
    }

    #[test]
    fn missing_places_file_fails() {
        let config = config(&[("FLEET_PLACES_FILE", "does/not/exist.json")]);
        let err = AppState::from_config(&config).err().unwrap();
        assert!(matches!(err, StartupError::Geocoder(GeocodeError::Load { .. })));
    }

    #[test]
    fn session_keys() {
        assert_eq!(session_key("trip-7"), "trip:trip-7");
    }
}
