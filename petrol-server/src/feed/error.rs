//! Station feed error types.

/// Errors that can occur while loading the station feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check BASEROW_TOKEN")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Feed is not configured
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Fixture file could not be read
    #[error("fixture error: {message}")]
    Fixture { message: String },

    /// Cache operation failed
    #[error("cache error: {message}")]
    Cache { message: String },
}
