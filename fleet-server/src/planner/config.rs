//! Trip planner configuration.

use std::fmt;
use std::str::FromStr;

/// Which supplied points contribute to the scored distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WaypointMode {
    /// Only the first two points (start and the next point) are measured.
    /// With stops present this ignores the destination.
    #[default]
    FirstLeg,

    /// Cumulative stop-to-stop distance over every point.
    AllStops,
}

/// Error returned when parsing an unknown waypoint mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown waypoint mode: {0} (expected first_leg or all_stops)")]
pub struct UnknownWaypointMode(pub String);

impl FromStr for WaypointMode {
    type Err = UnknownWaypointMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_leg" | "first-leg" => Ok(WaypointMode::FirstLeg),
            "all_stops" | "all-stops" => Ok(WaypointMode::AllStops),
            _ => Err(UnknownWaypointMode(s.to_string())),
        }
    }
}

impl fmt::Display for WaypointMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaypointMode::FirstLeg => f.write_str("first_leg"),
            WaypointMode::AllStops => f.write_str("all_stops"),
        }
    }
}

/// Configuration parameters for trip planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// How stops feed into the scored distance.
    pub waypoint_mode: WaypointMode,

    /// Substitute an interpolated straight-line path when the routing
    /// service has no route.
    pub straight_line_fallback: bool,

    /// Number of points in a straight-line fallback path.
    pub fallback_points: usize,

    /// Assumed speed for the fallback path's duration (km/h).
    pub fallback_speed_kmh: f64,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        waypoint_mode: WaypointMode,
        straight_line_fallback: bool,
        fallback_points: usize,
        fallback_speed_kmh: f64,
    ) -> Self {
        Self {
            waypoint_mode,
            straight_line_fallback,
            fallback_points,
            fallback_speed_kmh,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            waypoint_mode: WaypointMode::FirstLeg,
            straight_line_fallback: false,
            fallback_points: 50,
            fallback_speed_kmh: 40.0,
        }
    }
}
