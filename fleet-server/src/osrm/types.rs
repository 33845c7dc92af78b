//! OSRM route response types and conversion to domain types.
//!
//! Only the fields we use are modelled; serde ignores the rest
//! (legs, waypoints, weight).

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, PathPolyline};

use super::error::RoutingError;

/// Top-level `/route` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    /// "Ok" on success, otherwise an error code such as "NoRoute"
    pub code: String,

    /// Error detail accompanying a non-"Ok" code
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

/// One route alternative.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    /// Metres
    pub distance: f64,

    /// Seconds
    pub duration: f64,

    pub geometry: RouteGeometry,
}

/// GeoJSON LineString geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteGeometry {
    /// `[lng, lat]` pairs
    pub coordinates: Vec<[f64; 2]>,
}

/// A fetched driving path with the service's own metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedPath {
    pub path: PathPolyline,
    /// Metres
    pub distance_m: f64,
    /// Seconds
    pub duration_s: f64,
}

/// Interpret a `/route` response body.
///
/// Takes the first route and converts its geometry to `{lat, lng}` order,
/// keeping the service's start-to-destination ordering.
pub fn parse_route_response(
    status: u16,
    body: &str,
    from: Coordinate,
    to: Coordinate,
) -> Result<RoutedPath, RoutingError> {
    let response: RouteResponse = serde_json::from_str(body).map_err(|e| RoutingError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })?;

    match response.code.as_str() {
        "Ok" => {}
        "NoRoute" => return Err(RoutingError::NoRoute { from, to }),
        code => {
            let detail = response.message.unwrap_or_default();
            return Err(RoutingError::ApiError {
                status,
                message: format!("{code}: {detail}"),
            });
        }
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(RoutingError::NoRoute { from, to })?;

    let points = route
        .geometry
        .coordinates
        .into_iter()
        .map(Coordinate::from_lng_lat_pair)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| RoutingError::InvalidGeometry(e.to_string()))?;

    let path = PathPolyline::new(points).map_err(|_| RoutingError::NoRoute { from, to })?;

    Ok(RoutedPath {
        path,
        distance_m: route.distance,
        duration_s: route.duration,
    })
}
