//! Geocoding error types.

/// Errors that can occur when resolving a place name.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The query was empty or whitespace
    #[error("place name must not be empty")]
    InvalidQuery,

    /// The service returned no results
    #[error("location not found: {query}")]
    NotFound { query: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The result carried an unusable coordinate
    #[error("invalid coordinate in result for {query}: {message}")]
    InvalidResult { query: String, message: String },

    /// Failed to load offline place data
    #[error("failed to load places: {message}")]
    Load { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GeocodeError::NotFound {
            query: "zzzzzznotaplace".into(),
        };
        assert_eq!(err.to_string(), "location not found: zzzzzznotaplace");

        let err = GeocodeError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: Service Unavailable");
    }
}
