//! Place-name geocoding.
//!
//! Resolves free text ("Visakhapatnam") to a coordinate using an
//! OpenStreetMap Nominatim-compatible search endpoint. Only the first
//! result is used; an empty result set is reported as
//! [`GeocodeError::NotFound`] and never retried.

mod client;
mod error;
mod mock;

pub use client::{GeocoderClient, GeocoderConfig, SearchResultDto, parse_search_response};
pub use error::GeocodeError;
pub use mock::StaticGeocoder;
