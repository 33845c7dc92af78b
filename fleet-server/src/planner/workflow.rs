//! Trip planning workflow.
//!
//! Resolves place names, scores the trip and hands back a
//! [`TripPlanningSession`]. Fetching the path for a selected route is a
//! separate step so the estimates survive a routing failure.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::{Place, RouteKind, SelectedRoute, TripRequest};
use crate::geocode::GeocodeError;
use crate::osrm::{RoutedPath, RoutingError};

use super::providers::{Geocoder, PathProvider};
use super::scorer::{RouteScorer, ScoreError};
use super::session::{TripInput, TripPlanningSession};

/// Error from the trip planning workflow.
#[derive(Debug, thiserror::Error)]
pub enum TripError {
    /// Missing or malformed input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required place could not be resolved
    #[error("location not found: {query}")]
    NotFound { query: String },

    /// The geocoding service failed
    #[error("geocoding failed: {0}")]
    Geocoding(GeocodeError),

    /// No path could be fetched for the selected route
    #[error("route unavailable: {0}")]
    RouteUnavailable(#[from] RoutingError),

    /// A path was requested before any route was selected
    #[error("no route has been selected")]
    NoSelection,
}

impl From<GeocodeError> for TripError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound { query } => TripError::NotFound { query },
            GeocodeError::InvalidQuery => {
                TripError::InvalidInput("place name must not be empty".to_string())
            }
            other => TripError::Geocoding(other),
        }
    }
}

impl From<ScoreError> for TripError {
    fn from(err: ScoreError) -> Self {
        TripError::InvalidInput(err.to_string())
    }
}

/// Trip planner over a geocoder and a path provider.
#[derive(Debug)]
pub struct TripPlanner<G, P> {
    geocoder: G,
    paths: P,
    scorer: RouteScorer,
    next_id: AtomicU64,
}

impl<G: Geocoder + Sync, P: PathProvider + Sync> TripPlanner<G, P> {
    pub fn new(geocoder: G, paths: P, scorer: RouteScorer) -> Self {
        Self {
            geocoder,
            paths,
            scorer,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn scorer(&self) -> &RouteScorer {
        &self.scorer
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Resolve the trip's places and score it.
    ///
    /// Start and destination must both resolve; a stop that does not is
    /// skipped and reported in `skipped_stops`.
    pub async fn plan(&self, input: TripInput) -> Result<TripPlanningSession, TripError> {
        if input.start.trim().is_empty() {
            return Err(TripError::InvalidInput("start is required".to_string()));
        }
        if input.destination.trim().is_empty() {
            return Err(TripError::InvalidInput("destination is required".to_string()));
        }

        let start = self.geocoder.resolve(&input.start).await?;
        let destination = self.geocoder.resolve(&input.destination).await?;

        let (stops, skipped_stops) = self.resolve_stops(&input.stops).await?;

        let request = TripRequest::new(start.coordinate, destination.coordinate)
            .with_stops(stops.iter().map(|p| p.coordinate).collect());
        let estimates = self.scorer.score(&request.points())?;

        let id = format!("trip-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let preference = input.preference.unwrap_or(RouteKind::Shortest);

        info!(
            trip = %id,
            start = %start.display_name,
            destination = %destination.display_name,
            stops = stops.len(),
            skipped = skipped_stops.len(),
            "trip planned"
        );

        Ok(TripPlanningSession {
            id,
            created_at: Utc::now(),
            request,
            start,
            destination,
            stops,
            skipped_stops,
            estimates,
            preference,
            vehicle: input.vehicle,
            selected: None,
        })
    }

    /// Resolve stops concurrently, keeping input order.
    ///
    /// Names that are blank, unknown or resolve to a bad coordinate are
    /// skipped; transport failures abort.
    async fn resolve_stops(&self, names: &[String]) -> Result<(Vec<Place>, Vec<String>), TripError> {
        let results = join_all(names.iter().map(|name| self.geocoder.resolve(name))).await;

        let mut stops = Vec::with_capacity(names.len());
        let mut skipped = Vec::new();
        for (name, result) in names.iter().zip(results) {
            match result {
                Ok(place) => stops.push(place),
                Err(
                    e @ (GeocodeError::NotFound { .. }
                    | GeocodeError::InvalidQuery
                    | GeocodeError::InvalidResult { .. }),
                ) => {
                    debug!(stop = %name, error = %e, "skipping stop");
                    skipped.push(name.clone());
                }
                Err(e) => return Err(TripError::Geocoding(e)),
            }
        }
        Ok((stops, skipped))
    }

    /// Fetch the driving path for a selected route.
    pub async fn fetch_path(&self, selected: &SelectedRoute) -> Result<RoutedPath, TripError> {
        match self
            .paths
            .fetch_route(&selected.start, &selected.destination)
            .await
        {
            Ok(routed) => {
                debug!(
                    kind = %selected.chosen_kind,
                    points = routed.path.len(),
                    "path fetched"
                );
                Ok(routed)
            }
            Err(e) => {
                warn!(kind = %selected.chosen_kind, error = %e, "path unavailable");
                Err(TripError::RouteUnavailable(e))
            }
        }
    }

    /// Fetch the path for the session's current selection.
    pub async fn fetch_selected(
        &self,
        session: &TripPlanningSession,
    ) -> Result<RoutedPath, TripError> {
        let selected = session.selected.ok_or(TripError::NoSelection)?;
        self.fetch_path(&selected).await
    }
}
