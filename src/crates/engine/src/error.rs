//! Engine error taxonomy with HTTP-style status mapping.

use provider::ProviderError;
use thiserror::Error;

/// Fatal engine errors. Recoverable conditions (schema violations, unknown
/// tools, failing tool executions) are fed back into the conversation as
/// tool messages instead and never surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or rejected credential.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Transport-level failure reaching the provider.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider throttled the request.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The provider body could not be decoded at all.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// The conversation consumed its whole turn budget without a final
    /// answer.
    #[error("Conversation exhausted its turn budget ({turns} turns)")]
    LoopExhausted {
        /// Turns consumed before giving up.
        turns: usize,
    },

    /// Cooperative cancellation observed at a turn boundary.
    #[error("Conversation cancelled")]
    Cancelled,
}

impl EngineError {
    /// HTTP-style status for the [`crate::result::EngineResult`] envelope.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Authentication(_) => 401,
            Self::Network(_) | Self::MalformedResponse(_) | Self::Cancelled => 502,
            Self::RateLimited(_) | Self::LoopExhausted { .. } => 503,
        }
    }

    /// Whether retrying the same invocation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited(_) | Self::LoopExhausted { .. }
        )
    }

    /// Machine-readable error code for the result envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "auth_error",
            Self::Network(_) => "network_error",
            Self::RateLimited(_) => "rate_limited",
            Self::MalformedResponse(_) => "malformed_response",
            Self::LoopExhausted { .. } => "loop_exhausted",
            Self::Cancelled => "cancelled",
        }
    }
}

impl From<ProviderError> for EngineError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Authentication(msg) | ProviderError::MissingCredential(msg) => {
                Self::Authentication(msg)
            }
            ProviderError::RateLimited(msg) => Self::RateLimited(msg),
            ProviderError::Http(e) => Self::Network(e.to_string()),
            ProviderError::Serialization(msg) => Self::MalformedResponse(msg),
            ProviderError::Provider(msg) => Self::Network(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(EngineError::Authentication("no key".into()).status_code(), 401);
        assert_eq!(EngineError::Network("refused".into()).status_code(), 502);
        assert_eq!(
            EngineError::MalformedResponse("bad json".into()).status_code(),
            502
        );
        assert_eq!(EngineError::LoopExhausted { turns: 12 }.status_code(), 503);
    }

    #[test]
    fn test_retryability() {
        assert!(EngineError::LoopExhausted { turns: 12 }.is_retryable());
        assert!(EngineError::Network("timeout".into()).is_retryable());
        assert!(!EngineError::Authentication("bad key".into()).is_retryable());
        assert!(!EngineError::MalformedResponse("x".into()).is_retryable());
    }

    #[test]
    fn test_provider_error_mapping() {
        let err: EngineError = ProviderError::Authentication("401".into()).into();
        assert!(matches!(err, EngineError::Authentication(_)));

        let err: EngineError = ProviderError::RateLimited("429".into()).into();
        assert!(matches!(err, EngineError::RateLimited(_)));
    }
}
