//! Provider configuration.

use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the chat-completions provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for authentication. May be empty; the engine checks
    /// [`ProviderConfig::has_credential`] before any network call.
    pub api_key: String,

    /// Base URL for the API, e.g. "https://api.openai.com/v1".
    pub base_url: String,

    /// Model name/identifier.
    pub model: String,

    /// Request timeout duration.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Maximum conversation turns per engine invocation.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Whether to request streamed responses.
    #[serde(default)]
    pub streaming: bool,
}

impl ProviderConfig {
    /// Create a new provider configuration.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            timeout: default_timeout(),
            max_turns: default_max_turns(),
            streaming: false,
        }
    }

    /// Create configuration from an environment variable holding the key.
    pub fn from_env(
        env_var: &str,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let api_key = std::env::var(env_var).map_err(|_| {
            ProviderError::MissingCredential(format!("environment variable: {env_var}"))
        })?;

        Ok(Self::new(api_key, base_url, model))
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum conversation turns.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Enable or disable streamed responses.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Whether a usable credential is present.
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_max_turns() -> usize {
    12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ProviderConfig::new("test-key", "https://api.openai.com/v1", "gpt-4")
            .with_timeout(Duration::from_secs(30))
            .with_max_turns(5)
            .with_streaming(true);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_turns, 5);
        assert!(config.streaming);
    }

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::new("k", "url", "model");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_turns, 12);
        assert!(!config.streaming);
    }

    #[test]
    fn test_has_credential() {
        assert!(ProviderConfig::new("key", "url", "m").has_credential());
        assert!(!ProviderConfig::new("", "url", "m").has_credential());
        assert!(!ProviderConfig::new("   ", "url", "m").has_credential());
    }
}
