//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, Place, RouteEstimate, RouteKind, SelectedRoute, VehicleType};
use crate::osrm::RoutedPath;
use crate::planner::{RouteOption, TripInput, TripPlanningSession, routed_options};
use crate::simulator::SimulationSnapshot;

/// Query for a single place lookup.
#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    /// Free-text place name
    pub q: String,
}

/// Request to score a list of points.
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    /// Points in travel order, as `{lat, lng}` objects
    pub points: Vec<Coordinate>,
}

/// One route estimate.
#[derive(Debug, Serialize)]
pub struct EstimateResult {
    pub kind: RouteKind,

    /// Display label (e.g., "Traffic-Aware")
    pub label: &'static str,

    pub distance_km: f64,
    pub eta_hours: f64,

    /// ETA rounded to whole minutes
    pub eta_minutes: i64,
}

impl From<&RouteEstimate> for EstimateResult {
    fn from(estimate: &RouteEstimate) -> Self {
        Self {
            kind: estimate.kind,
            label: estimate.kind.label(),
            distance_km: estimate.distance_km,
            eta_hours: estimate.eta_hours,
            eta_minutes: estimate.eta_minutes(),
        }
    }
}

/// Response for point scoring.
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    /// Shortest, Traffic-Aware and Eco, in that order
    pub estimates: Vec<EstimateResult>,
}

/// Request to plan a trip from place names.
#[derive(Debug, Deserialize)]
pub struct PlanTripRequest {
    pub start: String,
    pub destination: String,

    #[serde(default)]
    pub stops: Vec<String>,

    /// Preferred route: a kind name or a form label such as "Least Traffic"
    pub preference: Option<String>,

    pub vehicle: Option<VehicleType>,
}

impl PlanTripRequest {
    /// Convert to workflow input, parsing the preference.
    pub fn into_input(self) -> Result<TripInput, String> {
        let preference = match self.preference.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<RouteKind>().map_err(|e| e.to_string())?),
        };

        Ok(TripInput {
            start: self.start,
            destination: self.destination,
            stops: self.stops,
            preference,
            vehicle: self.vehicle.unwrap_or_default(),
        })
    }
}

/// A planned trip.
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub start: Place,
    pub destination: Place,
    pub stops: Vec<Place>,

    /// Stop names that could not be resolved
    pub skipped_stops: Vec<String>,

    pub estimates: Vec<EstimateResult>,

    /// Kind matching the user's preference
    pub recommended: RouteKind,

    pub vehicle: VehicleType,
    pub selected: Option<SelectedRoute>,
}

impl TripResponse {
    pub fn from_session(session: &TripPlanningSession) -> Self {
        Self {
            id: session.id.clone(),
            created_at: session.created_at,
            start: session.start.clone(),
            destination: session.destination.clone(),
            stops: session.stops.clone(),
            skipped_stops: session.skipped_stops.clone(),
            estimates: session.estimates.iter().map(EstimateResult::from).collect(),
            recommended: session.recommended().kind,
            vehicle: session.vehicle,
            selected: session.selected,
        }
    }
}

/// Request to pick a route.
#[derive(Debug, Deserialize)]
pub struct SelectRouteRequest {
    /// Route kind name or label
    pub kind: String,
}

/// The fetched path for a selected route.
#[derive(Debug, Serialize)]
pub struct RoutedSummary {
    /// Number of points in the path
    pub path_len: usize,

    /// Path points in travel order
    pub path: Vec<Coordinate>,

    /// Routed distance in kilometres
    pub distance_km: f64,

    /// Routed duration in whole minutes
    pub duration_mins: i64,

    /// Display options scaled from the routed metrics
    pub options: Vec<RouteOption>,
}

impl RoutedSummary {
    pub fn from_routed(routed: &RoutedPath) -> Self {
        Self {
            path_len: routed.path.len(),
            path: routed.path.points().to_vec(),
            distance_km: routed.distance_m / 1000.0,
            duration_mins: (routed.duration_s / 60.0).round() as i64,
            options: routed_options(routed.distance_m, routed.duration_s),
        }
    }
}

/// Response for route selection.
#[derive(Debug, Serialize)]
pub struct SelectRouteResponse {
    pub selected: SelectedRoute,

    /// Estimate for the chosen kind
    pub estimate: EstimateResult,

    /// Expected arrival when leaving now
    pub arrives_at: DateTime<Utc>,

    /// Fetched path; absent when no route could be fetched
    pub route: Option<RoutedSummary>,

    /// Why the path is missing
    pub unavailable_reason: Option<String>,

    /// Whether live tracking was started
    pub tracking: bool,
}

/// Live tracking state for a trip.
#[derive(Debug, Serialize)]
pub struct TrackingResponse {
    pub trip_id: String,

    #[serde(flatten)]
    pub snapshot: SimulationSnapshot,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_accepts_form_labels() {
        let req: PlanTripRequest = serde_json::from_str(
            r#"{"start": "A", "destination": "B", "preference": "Least Traffic", "vehicle": "truck"}"#,
        )
        .unwrap();
        let input = req.into_input().unwrap();

        assert_eq!(input.preference, Some(RouteKind::TrafficAware));
        assert_eq!(input.vehicle, VehicleType::Truck);
        assert!(input.stops.is_empty());
    }

    #[test]
    fn blank_preference_is_none() {
        let req = PlanTripRequest {
            start: "A".into(),
            destination: "B".into(),
            stops: vec![],
            preference: Some("  ".into()),
            vehicle: None,
        };
        let input = req.into_input().unwrap();
        assert_eq!(input.preference, None);
        assert_eq!(input.vehicle, VehicleType::Car);
    }

    #[test]
    fn unknown_preference_rejected() {
        let req = PlanTripRequest {
            start: "A".into(),
            destination: "B".into(),
            stops: vec![],
            preference: Some("scenic".into()),
            vehicle: None,
        };
        assert!(req.into_input().unwrap_err().contains("scenic"));
    }

    #[test]
    fn estimate_request_validates_points() {
        let ok: Result<EstimateRequest, _> =
            serde_json::from_str(r#"{"points": [{"lat": 17.25, "lng": 82.5}]}"#);
        assert_eq!(ok.unwrap().points.len(), 1);

        let bad: Result<EstimateRequest, _> =
            serde_json::from_str(r#"{"points": [{"lat": 95.0, "lng": 82.5}]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn estimate_result_fields() {
        let estimate = RouteEstimate {
            kind: RouteKind::Eco,
            distance_km: 15.0,
            eta_hours: 0.5,
        };
        let json = serde_json::to_value(EstimateResult::from(&estimate)).unwrap();
        assert_eq!(json["kind"], "eco");
        assert_eq!(json["label"], "Eco-Friendly");
        assert_eq!(json["eta_minutes"], 30);
    }

    #[test]
    fn tracking_response_is_flat() {
        let response = TrackingResponse {
            trip_id: "trip-1".into(),
            snapshot: SimulationSnapshot::idle(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["trip_id"], "trip-1");
        assert_eq!(json["status"], "idle");
        assert_eq!(json["progress"], 0.0);
    }
}
