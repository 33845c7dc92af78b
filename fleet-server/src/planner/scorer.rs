//! Policy-based route estimates.
//!
//! Each policy scales the straight-line distance and divides by an assumed
//! average speed. No road network is consulted, so the estimates stay
//! available when the routing service is not.

use crate::domain::{Coordinate, RouteEstimate, RouteKind, haversine_km, path_length_km};

use super::config::WaypointMode;

/// Error from route scoring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    /// Fewer than two points supplied
    #[error("invalid input: need at least 2 points, got {0}")]
    InvalidInput(usize),
}

/// Distance multiplier and assumed speed for one route kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePolicy {
    pub kind: RouteKind,
    pub distance_multiplier: f64,
    pub speed_kmh: f64,
}

impl RoutePolicy {
    /// Estimate for a base (unscaled) distance.
    pub fn estimate(&self, base_distance_km: f64) -> RouteEstimate {
        let distance_km = base_distance_km * self.distance_multiplier;
        RouteEstimate {
            kind: self.kind,
            distance_km,
            eta_hours: distance_km / self.speed_kmh,
        }
    }
}

/// The three policies, in output order.
pub const POLICIES: [RoutePolicy; 3] = [
    RoutePolicy {
        kind: RouteKind::Shortest,
        distance_multiplier: 1.0,
        speed_kmh: 40.0,
    },
    RoutePolicy {
        kind: RouteKind::TrafficAware,
        distance_multiplier: 1.2,
        speed_kmh: 35.0,
    },
    RoutePolicy {
        kind: RouteKind::Eco,
        distance_multiplier: 1.1,
        speed_kmh: 30.0,
    },
];

/// Score using only `points[0]` and `points[1]`.
///
/// Returns Shortest, Traffic-Aware and Eco estimates, in that order.
pub fn score(points: &[Coordinate]) -> Result<[RouteEstimate; 3], ScoreError> {
    RouteScorer::new(WaypointMode::FirstLeg).score(points)
}

/// Route scorer with a configurable waypoint mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteScorer {
    mode: WaypointMode,
}

impl RouteScorer {
    pub fn new(mode: WaypointMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> WaypointMode {
        self.mode
    }

    /// Unscaled distance for the given points.
    pub fn base_distance_km(&self, points: &[Coordinate]) -> Result<f64, ScoreError> {
        if points.len() < 2 {
            return Err(ScoreError::InvalidInput(points.len()));
        }

        Ok(match self.mode {
            WaypointMode::FirstLeg => haversine_km(&points[0], &points[1]),
            WaypointMode::AllStops => path_length_km(points),
        })
    }

    /// Produce one estimate per policy.
    pub fn score(&self, points: &[Coordinate]) -> Result<[RouteEstimate; 3], ScoreError> {
        let base = self.base_distance_km(points)?;
        Ok(POLICIES.map(|policy| policy.estimate(base)))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng).unwrap())
    }

    proptest! {
        /// Same input, same output
        #[test]
        fn deterministic(a in coordinate(), b in coordinate()) {
            prop_assert_eq!(score(&[a, b]).unwrap(), score(&[a, b]).unwrap());
        }

        /// Multiplier relations hold exactly
        #[test]
        fn multipliers_exact(a in coordinate(), b in coordinate()) {
            let [shortest, traffic, eco] = score(&[a, b]).unwrap();
            prop_assert_eq!(traffic.distance_km, 1.2 * shortest.distance_km);
            prop_assert_eq!(eco.distance_km, 1.1 * shortest.distance_km);
        }

        /// Cumulative distance never undercuts the first leg
        #[test]
        fn all_stops_at_least_first_leg(a in coordinate(), b in coordinate(), c in coordinate()) {
            let points = [a, b, c];
            let first = RouteScorer::new(WaypointMode::FirstLeg).base_distance_km(&points).unwrap();
            let all = RouteScorer::new(WaypointMode::AllStops).base_distance_km(&points).unwrap();
            prop_assert!(all >= first);
        }
    }
}
