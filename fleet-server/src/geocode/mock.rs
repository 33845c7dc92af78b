//! Offline geocoder for development and testing without network access.
//!
//! Loads a fixed table of places from a JSON file and answers lookups
//! from it as if it were the live search API.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{Coordinate, Place};

use super::error::GeocodeError;

/// One entry of the places file.
#[derive(Debug, Deserialize)]
struct PlaceEntry {
    name: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    display_name: Option<String>,
}

/// Geocoder backed by a static name → place table.
///
/// Lookups are case-insensitive and ignore surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    places: Arc<HashMap<String, Place>>,
}

impl StaticGeocoder {
    /// Build from `(name, place)` pairs.
    pub fn from_places<I, S>(places: I) -> Self
    where
        I: IntoIterator<Item = (S, Place)>,
        S: AsRef<str>,
    {
        let places = places
            .into_iter()
            .map(|(name, place)| (normalize(name.as_ref()), place))
            .collect();
        Self {
            places: Arc::new(places),
        }
    }

    /// Load places from a JSON file.
    ///
    /// Expects an array of `{"name", "lat", "lng", "display_name"?}` objects.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GeocodeError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|e| GeocodeError::Load {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;

        let entries: Vec<PlaceEntry> =
            serde_json::from_str(&json).map_err(|e| GeocodeError::Load {
                message: format!("failed to parse {}: {}", path.display(), e),
            })?;

        let mut places = Vec::with_capacity(entries.len());
        for entry in entries {
            let coordinate = Coordinate::new(entry.lat, entry.lng).map_err(|e| GeocodeError::Load {
                message: format!("{}: {}", entry.name, e),
            })?;
            let display_name = entry.display_name.unwrap_or_else(|| entry.name.clone());
            places.push((
                entry.name,
                Place {
                    coordinate,
                    display_name,
                },
            ));
        }

        Ok(Self::from_places(places))
    }

    /// Number of known places.
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Look up a place by name.
    ///
    /// Mimics `GeocoderClient::resolve`.
    pub async fn resolve(&self, place_name: &str) -> Result<Place, GeocodeError> {
        let key = normalize(place_name);
        if key.is_empty() {
            return Err(GeocodeError::InvalidQuery);
        }

        self.places
            .get(&key)
            .cloned()
            .ok_or_else(|| GeocodeError::NotFound {
                query: place_name.trim().to_string(),
            })
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
