//! OSRM route service client.
//!
//! This module fetches driving geometry between two points from an
//! OSRM-compatible `/route/v1/driving` endpoint.
//!
//! Key characteristics of the OSRM wire format:
//! - Coordinates in the URL path are `lng,lat`, separated by `;`
//! - GeoJSON geometry is a list of `[lng, lat]` pairs
//! - `distance` is in metres and `duration` in seconds
//!
//! Axis order is swapped only here, through the named conversions on
//! [`Coordinate`](crate::domain::Coordinate).

mod client;
mod error;
mod types;

pub use client::{OsrmClient, OsrmConfig};
pub use error::RoutingError;
pub use types::{RouteDto, RouteGeometry, RouteResponse, RoutedPath, parse_route_response};
