//! Straight-line path provider.
//!
//! Interpolates evenly spaced points between start and destination. Used
//! offline, and as a fallback when the routing service has no route.

use tracing::warn;

use crate::domain::{Coordinate, PathPolyline, haversine_km};
use crate::osrm::{RoutedPath, RoutingError};

use super::providers::PathProvider;

/// Path provider that draws a straight line.
#[derive(Debug, Clone, Copy)]
pub struct StraightLineRouter {
    points: usize,
    speed_kmh: f64,
}

impl StraightLineRouter {
    /// `points` is clamped to at least 2.
    pub fn new(points: usize, speed_kmh: f64) -> Self {
        Self {
            points: points.max(2),
            speed_kmh,
        }
    }

    /// Build the interpolated route.
    ///
    /// Interpolation is linear in latitude/longitude; paths crossing the
    /// antimeridian take the long way round.
    pub fn route(
        &self,
        start: &Coordinate,
        destination: &Coordinate,
    ) -> Result<RoutedPath, RoutingError> {
        let last = self.points - 1;
        let steps = last as f64;
        let points = (0..self.points)
            .map(|i| {
                if i == last {
                    return Ok(*destination);
                }
                let t = i as f64 / steps;
                let lat = start.lat() + (destination.lat() - start.lat()) * t;
                let lng = start.lng() + (destination.lng() - start.lng()) * t;
                Coordinate::new(lat, lng)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RoutingError::InvalidGeometry(e.to_string()))?;

        let path = PathPolyline::new(points)
            .map_err(|e| RoutingError::InvalidGeometry(e.to_string()))?;

        let distance_km = haversine_km(start, destination);
        Ok(RoutedPath {
            path,
            distance_m: distance_km * 1000.0,
            duration_s: distance_km / self.speed_kmh * 3600.0,
        })
    }
}

impl PathProvider for StraightLineRouter {
    async fn fetch_route(
        &self,
        start: &Coordinate,
        destination: &Coordinate,
    ) -> Result<RoutedPath, RoutingError> {
        self.route(start, destination)
    }
}

/// Wraps a provider with an optional straight-line fallback.
#[derive(Debug, Clone)]
pub struct FallbackRouter<P> {
    primary: P,
    fallback: Option<StraightLineRouter>,
}

impl<P> FallbackRouter<P> {
    pub fn new(primary: P, fallback: Option<StraightLineRouter>) -> Self {
        Self { primary, fallback }
    }
}

impl<P: PathProvider + Sync> PathProvider for FallbackRouter<P> {
    async fn fetch_route(
        &self,
        start: &Coordinate,
        destination: &Coordinate,
    ) -> Result<RoutedPath, RoutingError> {
        match self.primary.fetch_route(start, destination).await {
            Ok(routed) => Ok(routed),
            Err(e) => match &self.fallback {
                Some(fallback) => {
                    warn!(error = %e, "routing failed, using straight-line path");
                    fallback.route(start, destination)
                }
                None => Err(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn endpoints_are_exact() {
        let router = StraightLineRouter::new(5, 40.0);
        let start = c(17.25, 82.5);
        let dest = c(17.35, 82.6);
        let routed = router.route(&start, &dest).unwrap();

        assert_eq!(routed.path.len(), 5);
        assert_eq!(routed.path.first(), start);
        assert_eq!(routed.path.last(), dest);
    }

    #[test]
    fn evenly_spaced() {
        let router = StraightLineRouter::new(3, 40.0);
        let routed = router.route(&c(0.0, 0.0), &c(2.0, 4.0)).unwrap();
        assert_eq!(routed.path.get(1), Some(c(1.0, 2.0)));
    }

    #[test]
    fn metrics_from_haversine() {
        let router = StraightLineRouter::new(2, 40.0);
        let start = c(0.0, 0.0);
        let dest = c(1.0, 0.0);
        let routed = router.route(&start, &dest).unwrap();

        let km = haversine_km(&start, &dest);
        assert!((routed.distance_m - km * 1000.0).abs() < 1e-6);
        assert!((routed.duration_s - km / 40.0 * 3600.0).abs() < 1e-6);
    }

    #[test]
    fn clamps_to_two_points() {
        let router = StraightLineRouter::new(0, 40.0);
        let routed = router.route(&c(0.0, 0.0), &c(1.0, 1.0)).unwrap();
        assert_eq!(routed.path.len(), 2);
    }

    /// Provider that always fails.
    struct NoRoutes;

    impl PathProvider for NoRoutes {
        async fn fetch_route(
            &self,
            start: &Coordinate,
            destination: &Coordinate,
        ) -> Result<RoutedPath, RoutingError> {
            Err(RoutingError::NoRoute {
                from: *start,
                to: *destination,
            })
        }
    }

    #[tokio::test]
    async fn fallback_used_on_failure() {
        let router = FallbackRouter::new(NoRoutes, Some(StraightLineRouter::new(4, 40.0)));
        let routed = router.fetch_route(&c(0.0, 0.0), &c(1.0, 1.0)).await.unwrap();
        assert_eq!(routed.path.len(), 4);
    }

    #[tokio::test]
    async fn no_fallback_propagates_error() {
        let router = FallbackRouter::new(NoRoutes, None);
        let err = router.fetch_route(&c(0.0, 0.0), &c(1.0, 1.0)).await.unwrap_err();
        assert!(matches!(err, RoutingError::NoRoute { .. }));
    }
}
