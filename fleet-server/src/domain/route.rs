//! Trip and route value types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Route policy used to derive an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Shortest,
    TrafficAware,
    Eco,
}

/// Error returned when parsing an unknown route kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown route kind: {0}")]
pub struct UnknownRouteKind(pub String);

impl RouteKind {
    /// All kinds, in comparison order.
    pub const ALL: [RouteKind; 3] = [RouteKind::Shortest, RouteKind::TrafficAware, RouteKind::Eco];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RouteKind::Shortest => "Shortest",
            RouteKind::TrafficAware => "Traffic-Aware",
            RouteKind::Eco => "Eco-Friendly",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RouteKind {
    type Err = UnknownRouteKind;

    /// Accepts snake_case names, display labels and the planning form's
    /// preference strings ("Shortest Time", "Least Traffic", "Energy Efficient").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "shortest" | "shortest_time" => Ok(RouteKind::Shortest),
            "traffic_aware" | "trafficaware" | "least_traffic" => Ok(RouteKind::TrafficAware),
            "eco" | "eco_friendly" | "energy_efficient" => Ok(RouteKind::Eco),
            _ => Err(UnknownRouteKind(s.to_string())),
        }
    }
}

/// Distance and travel time for one route policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub kind: RouteKind,
    pub distance_km: f64,
    pub eta_hours: f64,
}

impl RouteEstimate {
    /// ETA rounded to whole minutes.
    pub fn eta_minutes(&self) -> i64 {
        (self.eta_hours * 60.0).round() as i64
    }

    /// Travel time as a duration (second resolution).
    pub fn eta(&self) -> Duration {
        Duration::seconds((self.eta_hours * 3600.0).round() as i64)
    }

    /// Expected arrival when leaving at `departure`.
    pub fn arrival_at(&self, departure: DateTime<Utc>) -> DateTime<Utc> {
        departure + self.eta()
    }
}

/// Vehicle class chosen on the planning form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Bike,
    #[default]
    Car,
    Truck,
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub coordinate: Coordinate,
    /// Name reported by the geocoding service.
    pub display_name: String,
}

/// Resolved trip endpoints and intermediate stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub start: Coordinate,
    pub destination: Coordinate,
    #[serde(default)]
    pub stops: Vec<Coordinate>,
}

impl TripRequest {
    /// Create a request without stops.
    pub fn new(start: Coordinate, destination: Coordinate) -> Self {
        Self {
            start,
            destination,
            stops: Vec::new(),
        }
    }

    /// Add intermediate stops.
    pub fn with_stops(mut self, stops: Vec<Coordinate>) -> Self {
        self.stops = stops;
        self
    }

    /// Points in travel order: start, stops, destination.
    pub fn points(&self) -> Vec<Coordinate> {
        let mut points = Vec::with_capacity(self.stops.len() + 2);
        points.push(self.start);
        points.extend_from_slice(&self.stops);
        points.push(self.destination);
        points
    }
}

/// The route the user picked from the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedRoute {
    pub start: Coordinate,
    pub destination: Coordinate,
    pub chosen_kind: RouteKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn kind_labels() {
        assert_eq!(RouteKind::Shortest.to_string(), "Shortest");
        assert_eq!(RouteKind::TrafficAware.to_string(), "Traffic-Aware");
        assert_eq!(RouteKind::Eco.to_string(), "Eco-Friendly");
    }

    #[test]
    fn kind_parses_names_and_labels() {
        assert_eq!("shortest".parse::<RouteKind>().unwrap(), RouteKind::Shortest);
        assert_eq!("Traffic-Aware".parse::<RouteKind>().unwrap(), RouteKind::TrafficAware);
        assert_eq!("traffic_aware".parse::<RouteKind>().unwrap(), RouteKind::TrafficAware);
        assert_eq!("Eco-Friendly".parse::<RouteKind>().unwrap(), RouteKind::Eco);
        assert_eq!("Least Traffic".parse::<RouteKind>().unwrap(), RouteKind::TrafficAware);
        assert_eq!("Energy Efficient".parse::<RouteKind>().unwrap(), RouteKind::Eco);
        assert_eq!("Shortest Time".parse::<RouteKind>().unwrap(), RouteKind::Shortest);
        assert!("scenic".parse::<RouteKind>().is_err());
    }

    #[test]
    fn kind_serde_is_snake_case() {
        let json = serde_json::to_string(&RouteKind::TrafficAware).unwrap();
        assert_eq!(json, "\"traffic_aware\"");
    }

    #[test]
    fn estimate_time_helpers() {
        let est = RouteEstimate {
            kind: RouteKind::Shortest,
            distance_km: 20.0,
            eta_hours: 0.5,
        };
        assert_eq!(est.eta_minutes(), 30);
        assert_eq!(est.eta(), Duration::minutes(30));

        let departure = DateTime::parse_from_rfc3339("2024-03-15T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let arrival = est.arrival_at(departure);
        assert_eq!(arrival.to_rfc3339(), "2024-03-15T10:30:00+00:00");
    }

    #[test]
    fn points_keep_travel_order() {
        let start = c(1.0, 1.0);
        let stop = c(2.0, 2.0);
        let dest = c(3.0, 3.0);
        let req = TripRequest::new(start, dest).with_stops(vec![stop]);
        assert_eq!(req.points(), vec![start, stop, dest]);
    }

    #[test]
    fn trip_request_stops_default_to_empty() {
        let req: TripRequest = serde_json::from_str(
            r#"{"start": {"lat": 1.0, "lng": 1.0}, "destination": {"lat": 2.0, "lng": 2.0}}"#,
        )
        .unwrap();
        assert!(req.stops.is_empty());
    }
}
