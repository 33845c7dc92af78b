//! Great-circle distance.

use super::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometres.
///
/// # Examples
///
/// ```
/// use fleet_server::domain::{Coordinate, haversine_km};
///
/// let a = Coordinate::new(17.25, 82.5).unwrap();
/// let b = Coordinate::new(17.35, 82.6).unwrap();
/// let d = haversine_km(&a, &b);
/// assert!((d - 15.37).abs() < 0.01);
/// assert_eq!(haversine_km(&a, &a), 0.0);
/// ```
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lng = (b.lng() - a.lng()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

    // Rounding can push h a hair past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Sum of haversine distances along consecutive points.
pub fn path_length_km(points: &[Coordinate]) -> f64 {
    points.windows(2).map(|w| haversine_km(&w[0], &w[1])).sum()
}
