//! Seams between the planner and external services.
//!
//! These traits allow the planner to be tested with mock data and run
//! offline.

use std::future::Future;

use crate::domain::{Coordinate, Place};
use crate::geocode::{GeocodeError, GeocoderClient, StaticGeocoder};
use crate::osrm::{OsrmClient, RoutedPath, RoutingError};

/// Trait for resolving place names.
pub trait Geocoder {
    /// Resolve free text to the first matching place.
    fn resolve(&self, place_name: &str) -> impl Future<Output = Result<Place, GeocodeError>> + Send;
}

/// Trait for fetching driving paths.
pub trait PathProvider {
    /// Fetch a path from `start` to `destination`, in travel order.
    fn fetch_route(
        &self,
        start: &Coordinate,
        destination: &Coordinate,
    ) -> impl Future<Output = Result<RoutedPath, RoutingError>> + Send;
}

impl Geocoder for GeocoderClient {
    async fn resolve(&self, place_name: &str) -> Result<Place, GeocodeError> {
        GeocoderClient::resolve(self, place_name).await
    }
}

impl Geocoder for StaticGeocoder {
    async fn resolve(&self, place_name: &str) -> Result<Place, GeocodeError> {
        StaticGeocoder::resolve(self, place_name).await
    }
}

/// Geocoder chosen at start-up: live service or an offline places file.
#[derive(Debug, Clone)]
pub enum GeocoderBackend {
    Nominatim(GeocoderClient),
    Static(StaticGeocoder),
}

impl Geocoder for GeocoderBackend {
    async fn resolve(&self, place_name: &str) -> Result<Place, GeocodeError> {
        match self {
            GeocoderBackend::Nominatim(client) => client.resolve(place_name).await,
            GeocoderBackend::Static(table) => table.resolve(place_name).await,
        }
    }
}

impl PathProvider for OsrmClient {
    async fn fetch_route(
        &self,
        start: &Coordinate,
        destination: &Coordinate,
    ) -> Result<RoutedPath, RoutingError> {
        OsrmClient::fetch_route(self, start, destination).await
    }
}
