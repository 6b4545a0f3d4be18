//! Error types for provider protocol handling.

use thiserror::Error;

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur when talking to the AI provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed (connection failure, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API authentication failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// No usable credential was configured.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Failed to serialize the request body.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Provider returned a non-success status outside the mapped classes.
    #[error("Provider error: {0}")]
    Provider(String),
}

impl ProviderError {
    /// Whether retrying the whole request is safe.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Http(_) | ProviderError::RateLimited(_)
        )
    }

    /// Whether this error is an authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ProviderError::Authentication(_) | ProviderError::MissingCredential(_)
        )
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_classification() {
        assert!(ProviderError::Authentication("bad key".into()).is_auth_error());
        assert!(ProviderError::MissingCredential("no key".into()).is_auth_error());
        assert!(!ProviderError::Provider("boom".into()).is_auth_error());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ProviderError::RateLimited("slow down".into()).is_retryable());
        assert!(!ProviderError::Authentication("bad key".into()).is_retryable());
        assert!(!ProviderError::MissingCredential("no key".into()).is_retryable());
    }
}
