//! OSRM HTTP client.
//!
//! Requests the driving profile with full GeoJSON geometry and converts the
//! first returned route to domain types.

use tracing::debug;

use crate::domain::{Coordinate, PathPolyline};

use super::error::RoutingError;
use super::types::{RoutedPath, parse_route_response};

/// Default base URL for the public OSRM demo server.
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL for the API (defaults to the public demo server)
    pub base_url: String,
    /// Routing profile path segment
    pub profile: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    /// Create a config for the public demo server.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (self-hosted instance or testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// OSRM route API client.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    profile: String,
}

impl OsrmClient {
    /// Create a new OSRM client with the given configuration.
    pub fn new(config: OsrmConfig) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile,
        })
    }

    /// Build the route URL for a start/destination pair.
    ///
    /// Coordinates go on the wire as `lng,lat`.
    pub fn route_url(&self, start: &Coordinate, destination: &Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{};{}",
            self.base_url,
            self.profile,
            start.wire_lng_lat(),
            destination.wire_lng_lat()
        )
    }

    /// Fetch the first driving route between two points, with its metrics.
    pub async fn fetch_route(
        &self,
        start: &Coordinate,
        destination: &Coordinate,
    ) -> Result<RoutedPath, RoutingError> {
        let url = self.route_url(start, destination);
        debug!(%url, "fetching route");

        let response = self
            .http
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // OSRM reports NoRoute and friends as JSON on 4xx; anything else
        // without a JSON body is a plain API error.
        if !status.is_success() && !body.trim_start().starts_with('{') {
            return Err(RoutingError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let routed = parse_route_response(status.as_u16(), &body, *start, *destination)?;
        debug!(
            points = routed.path.len(),
            distance_m = routed.distance_m,
            duration_s = routed.duration_s,
            "route fetched"
        );
        Ok(routed)
    }

    /// Fetch only the path geometry.
    pub async fn fetch_path(
        &self,
        start: &Coordinate,
        destination: &Coordinate,
    ) -> Result<PathPolyline, RoutingError> {
        Ok(self.fetch_route(start, destination).await?.path)
    }
}
