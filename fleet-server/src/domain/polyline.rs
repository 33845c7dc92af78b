//! Driving path geometry.

use serde::{Deserialize, Serialize};

use super::Coordinate;
use super::distance::path_length_km;
use super::error::DomainError;

/// A non-empty, ordered sequence of coordinates from start to destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinate>", into = "Vec<Coordinate>")]
pub struct PathPolyline(Vec<Coordinate>);

impl PathPolyline {
    /// Create a polyline, rejecting an empty sequence.
    pub fn new(points: Vec<Coordinate>) -> Result<Self, DomainError> {
        if points.is_empty() {
            return Err(DomainError::EmptyPath);
        }
        Ok(Self(points))
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the final point.
    pub fn last_index(&self) -> usize {
        self.0.len() - 1
    }

    /// Point at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<Coordinate> {
        self.0.get(index).copied()
    }

    /// First point.
    pub fn first(&self) -> Coordinate {
        self.0[0]
    }

    /// Final point.
    pub fn last(&self) -> Coordinate {
        self.0[self.0.len() - 1]
    }

    /// All points.
    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    /// Length along the path in kilometres.
    pub fn length_km(&self) -> f64 {
        path_length_km(&self.0)
    }
}

impl TryFrom<Vec<Coordinate>> for PathPolyline {
    type Error = DomainError;

    fn try_from(points: Vec<Coordinate>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<PathPolyline> for Vec<Coordinate> {
    fn from(path: PathPolyline) -> Self {
        path.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(PathPolyline::new(vec![]), Err(DomainError::EmptyPath)));
    }

    #[test]
    fn accessors() {
        let path = PathPolyline::new(vec![c(0.0, 0.0), c(0.0, 1.0), c(0.0, 2.0)]).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.last_index(), 2);
        assert_eq!(path.first(), c(0.0, 0.0));
        assert_eq!(path.last(), c(0.0, 2.0));
        assert_eq!(path.get(1), Some(c(0.0, 1.0)));
        assert_eq!(path.get(3), None);
        assert!(!path.is_empty());
    }

    #[test]
    fn single_point_path() {
        let path = PathPolyline::new(vec![c(5.0, 5.0)]).unwrap();
        assert_eq!(path.last_index(), 0);
        assert_eq!(path.first(), path.last());
        assert_eq!(path.length_km(), 0.0);
    }

    #[test]
    fn deserialize_rejects_empty() {
        let ok: Result<PathPolyline, _> = serde_json::from_str(r#"[{"lat": 1.0, "lng": 2.0}]"#);
        assert!(ok.is_ok());
        let empty: Result<PathPolyline, _> = serde_json::from_str("[]");
        assert!(empty.is_err());
    }
}
