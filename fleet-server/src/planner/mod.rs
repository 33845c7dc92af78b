//! Route planning.
//!
//! Scores a trip under three routing policies, turns a routed path into
//! display options, and runs the plan → select → fetch workflow that the
//! HTTP layer drives.

mod config;
mod options;
mod providers;
mod scorer;
mod session;
mod straight_line;
mod workflow;

pub use config::{PlannerConfig, UnknownWaypointMode, WaypointMode};
pub use options::{RouteOption, TrafficLevel, routed_options};
pub use providers::{Geocoder, GeocoderBackend, PathProvider};
pub use scorer::{POLICIES, RoutePolicy, RouteScorer, ScoreError, score};
pub use session::{TripInput, TripPlanningSession};
pub use straight_line::{FallbackRouter, StraightLineRouter};
pub use workflow::{TripError, TripPlanner};
