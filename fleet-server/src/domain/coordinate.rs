//! Geographic coordinate type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when constructing an out-of-range or unparsable coordinate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

/// A WGS84 latitude/longitude pair.
///
/// Latitude is always in `[-90, 90]` and longitude in `[-180, 180]`; this
/// type guarantees that any `Coordinate` value is valid by construction.
/// The internal field order is always `{lat, lng}`. Routing services that
/// expect longitude first must go through [`Coordinate::to_lng_lat_pair`]
/// and [`Coordinate::from_lng_lat_pair`].
///
/// # Examples
///
/// ```
/// use fleet_server::domain::Coordinate;
///
/// let vizag = Coordinate::new(17.6868, 83.2185).unwrap();
/// assert_eq!(vizag.lat(), 17.6868);
///
/// // Out of range is rejected
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, -180.5).is_err());
///
/// // Stored "lat,lng" strings parse too
/// assert_eq!(Coordinate::parse("17.6868,83.2185").unwrap(), vizag);
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

/// Unvalidated shape used for deserialization.
#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    /// Create a coordinate, checking both axes are finite and in range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(InvalidCoordinate {
                reason: "latitude and longitude must be finite",
            });
        }

        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                reason: "latitude must be between -90 and 90",
            });
        }

        if !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidCoordinate {
                reason: "longitude must be between -180 and 180",
            });
        }

        Ok(Self { lat, lng })
    }

    /// Parse the `"lat,lng"` string form used for stored trip data.
    ///
    /// Whitespace around either number is ignored.
    pub fn parse(s: &str) -> Result<Self, InvalidCoordinate> {
        let (lat, lng) = s.split_once(',').ok_or(InvalidCoordinate {
            reason: "expected \"lat,lng\"",
        })?;

        let lat = lat.trim().parse::<f64>().map_err(|_| InvalidCoordinate {
            reason: "latitude is not a number",
        })?;
        let lng = lng.trim().parse::<f64>().map_err(|_| InvalidCoordinate {
            reason: "longitude is not a number",
        })?;

        Self::new(lat, lng)
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Convert to the `[lng, lat]` pair used by GeoJSON and OSRM.
    pub fn to_lng_lat_pair(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Build from a GeoJSON / OSRM `[lng, lat]` pair.
    pub fn from_lng_lat_pair(pair: [f64; 2]) -> Result<Self, InvalidCoordinate> {
        let [lng, lat] = pair;
        Self::new(lat, lng)
    }

    /// Format as the `lng,lat` path segment used in OSRM URLs.
    pub fn wire_lng_lat(&self) -> String {
        format!("{},{}", self.lng, self.lat)
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lat, self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any in-range pair is accepted and preserved
        #[test]
        fn in_range_accepted(lat in -90.0f64..=90.0, lng in -180.0f64..=180.0) {
            let c = Coordinate::new(lat, lng).unwrap();
            prop_assert_eq!(c.lat(), lat);
            prop_assert_eq!(c.lng(), lng);
        }

        /// Latitudes beyond the poles are always rejected
        #[test]
        fn polar_overflow_rejected(lat in 90.0001f64..1000.0, lng in -180.0f64..=180.0) {
            prop_assert!(Coordinate::new(lat, lng).is_err());
            prop_assert!(Coordinate::new(-lat, lng).is_err());
        }

        /// The wire pair swaps axes and swaps them back
        #[test]
        fn wire_pair_inverts(lat in -90.0f64..=90.0, lng in -180.0f64..=180.0) {
            let c = Coordinate::new(lat, lng).unwrap();
            let pair = c.to_lng_lat_pair();
            prop_assert_eq!(pair[0], lng);
            prop_assert_eq!(Coordinate::from_lng_lat_pair(pair).unwrap(), c);
        }
    }
}
