//! Domain types for route estimation and simulated transit.
//!
//! This module contains the core value types shared by the geocoder, the
//! routing client, the scorer and the simulator. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod coordinate;
mod distance;
mod error;
mod polyline;
mod route;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use distance::{EARTH_RADIUS_KM, haversine_km, path_length_km};
pub use error::DomainError;
pub use polyline::PathPolyline;
pub use route::{
    Place, RouteEstimate, RouteKind, SelectedRoute, TripRequest, UnknownRouteKind, VehicleType,
};
