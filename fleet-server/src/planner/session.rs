//! Trip planning session.
//!
//! The session is a plain value handed from one workflow step to the next:
//! planning fills in the resolved places and estimates, selection records
//! the chosen kind. Nothing here reads or writes shared state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Place, RouteEstimate, RouteKind, SelectedRoute, TripRequest, VehicleType};

/// Raw planning input: free-text place names and preferences.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TripInput {
    pub start: String,
    pub destination: String,
    #[serde(default)]
    pub stops: Vec<String>,
    /// Preferred route kind; defaults to Shortest.
    #[serde(default)]
    pub preference: Option<RouteKind>,
    #[serde(default)]
    pub vehicle: VehicleType,
}

impl TripInput {
    pub fn new(start: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn with_stops<I, S>(mut self, stops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stops = stops.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_preference(mut self, kind: RouteKind) -> Self {
        self.preference = Some(kind);
        self
    }
}

/// State carried between the planning, comparison and tracking steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlanningSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub request: TripRequest,
    pub start: Place,
    pub destination: Place,
    /// Stops that resolved, in input order.
    pub stops: Vec<Place>,
    /// Stop names that could not be resolved and were left out.
    pub skipped_stops: Vec<String>,
    /// Shortest, Traffic-Aware, Eco.
    pub estimates: [RouteEstimate; 3],
    pub preference: RouteKind,
    pub vehicle: VehicleType,
    pub selected: Option<SelectedRoute>,
}

impl TripPlanningSession {
    /// Estimate for a given kind.
    pub fn estimate(&self, kind: RouteKind) -> &RouteEstimate {
        // estimates always holds one entry per kind, in RouteKind::ALL order
        let idx = RouteKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        &self.estimates[idx]
    }

    /// Estimate matching the user's preference.
    pub fn recommended(&self) -> &RouteEstimate {
        self.estimate(self.preference)
    }

    /// Record the user's choice and return the route handed to the path fetcher.
    pub fn select(&mut self, kind: RouteKind) -> SelectedRoute {
        let selected = SelectedRoute {
            start: self.request.start,
            destination: self.request.destination,
            chosen_kind: kind,
        };
        self.selected = Some(selected);
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;
    use crate::planner::scorer::score;

    fn place(lat: f64, lng: f64, name: &str) -> Place {
        Place {
            coordinate: Coordinate::new(lat, lng).unwrap(),
            display_name: name.to_string(),
        }
    }

    fn session() -> TripPlanningSession {
        let start = place(17.25, 82.5, "A");
        let destination = place(17.35, 82.6, "B");
        let request = TripRequest::new(start.coordinate, destination.coordinate);
        let estimates = score(&request.points()).unwrap();

        TripPlanningSession {
            id: "trip-1".to_string(),
            created_at: Utc::now(),
            request,
            start,
            destination,
            stops: Vec::new(),
            skipped_stops: Vec::new(),
            estimates,
            preference: RouteKind::Eco,
            vehicle: VehicleType::Car,
            selected: None,
        }
    }

    #[test]
    fn estimate_by_kind() {
        let s = session();
        for kind in RouteKind::ALL {
            assert_eq!(s.estimate(kind).kind, kind);
        }
        assert_eq!(s.recommended().kind, RouteKind::Eco);
    }

    #[test]
    fn select_records_choice() {
        let mut s = session();
        let selected = s.select(RouteKind::TrafficAware);

        assert_eq!(selected.start, s.request.start);
        assert_eq!(selected.destination, s.request.destination);
        assert_eq!(selected.chosen_kind, RouteKind::TrafficAware);
        assert_eq!(s.selected, Some(selected));
    }

    #[test]
    fn serde_roundtrip() {
        let s = session();
        let json = serde_json::to_string(&s).unwrap();
        let back: TripPlanningSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn input_defaults() {
        let input: TripInput =
            serde_json::from_str(r#"{"start": "Vizag", "destination": "Vijayawada"}"#).unwrap();
        assert!(input.stops.is_empty());
        assert_eq!(input.preference, None);
        assert_eq!(input.vehicle, VehicleType::Car);
    }

    #[test]
    fn input_builder() {
        let input = TripInput::new("A", "B")
            .with_stops(["C", "D"])
            .with_preference(RouteKind::Eco);
        assert_eq!(input.stops, vec!["C".to_string(), "D".to_string()]);
        assert_eq!(input.preference, Some(RouteKind::Eco));
    }
}
