//! Display options derived from a real routed path.
//!
//! The routing service returns one geometry; the three options shown for it
//! are scaled from that route's distance and duration.

use serde::Serialize;

use crate::domain::RouteKind;

/// Coarse traffic label shown alongside an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrafficLevel {
    Low,
    Moderate,
    High,
}

/// One routed option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOption {
    pub id: &'static str,
    pub kind: RouteKind,
    pub label: &'static str,
    pub tag: &'static str,
    /// Kilometres, one decimal place
    pub distance_km: f64,
    pub duration_mins: i64,
    /// Currency units, whole numbers
    pub cost: i64,
    pub traffic_level: TrafficLevel,
}

struct OptionTemplate {
    id: &'static str,
    kind: RouteKind,
    label: &'static str,
    tag: &'static str,
    distance_factor: f64,
    duration_factor: f64,
    cost_per_km: f64,
    traffic_level: TrafficLevel,
}

const TEMPLATES: [OptionTemplate; 3] = [
    OptionTemplate {
        id: "fastest",
        kind: RouteKind::TrafficAware,
        label: "Fastest (Traffic-Aware)",
        tag: "Recommended",
        distance_factor: 1.0,
        duration_factor: 1.0,
        cost_per_km: 12.0,
        traffic_level: TrafficLevel::High,
    },
    OptionTemplate {
        id: "eco",
        kind: RouteKind::Eco,
        label: "Eco-Friendly",
        tag: "Green Choice",
        distance_factor: 1.1,
        duration_factor: 1.2,
        cost_per_km: 10.0,
        traffic_level: TrafficLevel::Low,
    },
    OptionTemplate {
        id: "shortest",
        kind: RouteKind::Shortest,
        label: "Shortest (Dijkstra)",
        tag: "Distance Saver",
        distance_factor: 0.95,
        duration_factor: 1.1,
        cost_per_km: 14.0,
        traffic_level: TrafficLevel::Moderate,
    },
];

/// Build the fastest / eco / shortest options for a route.
///
/// `distance_m` and `duration_s` are the routing service's own metrics.
/// Cost is always charged on the base distance.
pub fn routed_options(distance_m: f64, duration_s: f64) -> Vec<RouteOption> {
    let distance_km = distance_m / 1000.0;
    let duration_mins = duration_s / 60.0;

    TEMPLATES
        .iter()
        .map(|t| RouteOption {
            id: t.id,
            kind: t.kind,
            label: t.label,
            tag: t.tag,
            distance_km: round_tenths(distance_km * t.distance_factor),
            duration_mins: (duration_mins * t.duration_factor).round() as i64,
            cost: (distance_km * t.cost_per_km).round() as i64,
            traffic_level: t.traffic_level,
        })
        .collect()
}

fn round_tenths(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_options_in_order() {
        let options = routed_options(10_000.0, 1_200.0);
        let ids: Vec<_> = options.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["fastest", "eco", "shortest"]);
    }

    #[test]
    fn option_values() {
        // 10 km, 20 minutes
        let options = routed_options(10_000.0, 1_200.0);

        let fastest = &options[0];
        assert_eq!(fastest.distance_km, 10.0);
        assert_eq!(fastest.duration_mins, 20);
        assert_eq!(fastest.cost, 120);
        assert_eq!(fastest.traffic_level, TrafficLevel::High);
        assert_eq!(fastest.kind, RouteKind::TrafficAware);

        let eco = &options[1];
        assert_eq!(eco.distance_km, 11.0);
        assert_eq!(eco.duration_mins, 24);
        assert_eq!(eco.cost, 100);
        assert_eq!(eco.tag, "Green Choice");

        let shortest = &options[2];
        assert_eq!(shortest.distance_km, 9.5);
        assert_eq!(shortest.duration_mins, 22);
        assert_eq!(shortest.cost, 140);
        assert_eq!(shortest.label, "Shortest (Dijkstra)");
    }

    #[test]
    fn rounds_for_display() {
        // 18.2345 km, 25.338 minutes
        let options = routed_options(18_234.5, 1_520.3);
        assert_eq!(options[0].distance_km, 18.2);
        assert_eq!(options[0].duration_mins, 25);
        assert_eq!(options[0].cost, 219);
        assert_eq!(options[1].distance_km, 20.1);
        assert_eq!(options[1].duration_mins, 30);
    }
}
