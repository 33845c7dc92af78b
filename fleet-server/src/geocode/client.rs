//! Nominatim search client.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Coordinate, Place};

use super::error::GeocodeError;

/// Default base URL for the public OpenStreetMap Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy asks for at most one request at a time.
const DEFAULT_MAX_CONCURRENT: usize = 1;

/// Default identifying user agent.
const DEFAULT_USER_AGENT: &str = concat!("fleet-server/", env!("CARGO_PKG_VERSION"));

/// Nominatim returns coordinates as strings; other instances use numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::String(s) => s.trim().parse().ok(),
        }
    }
}

/// Minimal DTO for a search hit - we only need the point and its name.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResultDto {
    lat: NumberOrString,
    lon: NumberOrString,
    #[serde(default)]
    display_name: String,
}

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Value of the User-Agent header
    pub user_agent: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    /// Create a config pointing at the public Nominatim instance.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (self-hosted instance or testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for a Nominatim-compatible search API.
#[derive(Debug, Clone)]
pub struct GeocoderClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl GeocoderClient {
    /// Create a new geocoding client.
    pub fn new(config: GeocoderConfig) -> Result<Self, GeocodeError> {
        let mut headers = HeaderMap::new();

        let agent = HeaderValue::from_str(&config.user_agent).map_err(|_| GeocodeError::Api {
            status: 0,
            message: "Invalid user agent".to_string(),
        })?;
        headers.insert(USER_AGENT, agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Resolve a place name to its first search hit.
    pub async fn resolve(&self, place_name: &str) -> Result<Place, GeocodeError> {
        let query = place_name.trim();
        if query.is_empty() {
            return Err(GeocodeError::InvalidQuery);
        }

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| GeocodeError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/search", self.base_url);
        debug!(query, "geocoding");

        let response = self
            .http
            .get(&url)
            .query(&[("format", "json"), ("limit", "1"), ("q", query)])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        parse_search_response(query, &body)
    }
}

/// Parse a search response body and take the first hit.
pub fn parse_search_response(query: &str, body: &str) -> Result<Place, GeocodeError> {
    let results: Vec<SearchResultDto> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Json {
            message: e.to_string(),
        })?;

    let first = results.into_iter().next().ok_or_else(|| GeocodeError::NotFound {
        query: query.to_string(),
    })?;

    let invalid = |message: String| GeocodeError::InvalidResult {
        query: query.to_string(),
        message,
    };

    let lat = first
        .lat
        .as_f64()
        .ok_or_else(|| invalid("latitude is not a number".to_string()))?;
    let lng = first
        .lon
        .as_f64()
        .ok_or_else(|| invalid("longitude is not a number".to_string()))?;
    let coordinate = Coordinate::new(lat, lng).map_err(|e| invalid(e.to_string()))?;

    Ok(Place {
        coordinate,
        display_name: first.display_name,
    })
}
