//! Crate-wide error hierarchy for review-target.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type ReviewTargetResult<T> = Result<T, ReviewTargetError>;

/// Root error type for the review-target crate.
#[derive(Debug, Error)]
pub enum ReviewTargetError {
    /// Review tool (Upsource/GitLab/GitHub) related failure.
    #[error(transparent)]
    Provider(#[from] ReviewTargetProviderError),

    /// Configuration problems (missing credentials, bad base URL, etc.).
    #[error(transparent)]
    Config(#[from] ReviewTargetConfigError),

    /// Input validation errors (bad project ids, non-numeric review ids).
    #[error("validation error: {0}")]
    Validation(String),
}

/// Provider-specific error used inside the provider layer.
#[derive(Debug, Error)]
pub enum ReviewTargetProviderError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited,

    /// Gateway / server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (non-2xx) not covered by specific variants.
    #[error("http status error: status {0}")]
    HttpStatus(u16),

    /// Connect or read timeout.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not have the expected shape.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Upsource answered the RPC call with an `error` object.
    #[error("rpc `{method}` failed: {message}")]
    Rpc { method: String, message: String },
}

/// Configuration and setup errors.
#[derive(Debug, Error)]
pub enum ReviewTargetConfigError {
    /// Missing credential (token, username or password).
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// Base URL is empty or not http(s).
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    /// HTTP client could not be built.
    #[error("http client build failed: {0}")]
    HttpClient(String),
}

impl From<reqwest::Error> for ReviewTargetError {
    fn from(e: reqwest::Error) -> Self {
        ReviewTargetError::Provider(ReviewTargetProviderError::from(e))
    }
}

impl From<reqwest::Error> for ReviewTargetProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return ReviewTargetProviderError::Timeout;
        }

        if let Some(status) = e.status() {
            return Self::from_status(status.as_u16());
        }

        if e.is_decode() {
            return ReviewTargetProviderError::InvalidResponse(e.to_string());
        }

        ReviewTargetProviderError::Network(e.to_string())
    }
}

impl ReviewTargetProviderError {
    /// Maps a non-2xx HTTP status code to a provider error.
    pub fn from_status(code: u16) -> Self {
        match code {
            401 => ReviewTargetProviderError::Unauthorized,
            403 => ReviewTargetProviderError::Forbidden,
            404 => ReviewTargetProviderError::NotFound,
            429 => ReviewTargetProviderError::RateLimited,
            500..=599 => ReviewTargetProviderError::Server(code),
            _ => ReviewTargetProviderError::HttpStatus(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_status_codes() {
        assert!(matches!(
            ReviewTargetProviderError::from_status(401),
            ReviewTargetProviderError::Unauthorized
        ));
        assert!(matches!(
            ReviewTargetProviderError::from_status(404),
            ReviewTargetProviderError::NotFound
        ));
        assert!(matches!(
            ReviewTargetProviderError::from_status(503),
            ReviewTargetProviderError::Server(503)
        ));
        assert!(matches!(
            ReviewTargetProviderError::from_status(418),
            ReviewTargetProviderError::HttpStatus(418)
        ));
    }
}
