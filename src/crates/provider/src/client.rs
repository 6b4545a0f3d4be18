//! Chat transport: the seam between the conversation loop and the wire.
//!
//! [`ChatTransport`] abstracts one provider round-trip; the loop parses the
//! returned body with the parser matching the request's transport mode.
//! [`HttpChatTransport`] is the reqwest implementation against an
//! OpenAI-style `chat/completions` endpoint; tests script their own
//! implementations.

use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use crate::types::{ChatMessage, ToolDefinition};
use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;

/// One provider request: ordered messages plus advertised tool schemas.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Conversation so far, in order.
    pub messages: Vec<ChatMessage>,

    /// Tool schemas advertised for this turn.
    pub tools: Vec<ToolDefinition>,

    /// Whether the response should be streamed.
    pub stream: bool,
}

impl ChatRequest {
    /// Create a non-streaming request with no tools.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
            stream: false,
        }
    }

    /// Advertise tool schemas.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Request a streamed response.
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// One round-trip to the provider, returning the raw response body.
///
/// The body is parsed by [`crate::parser::parse_response`] or
/// [`crate::stream::parse_stream`] depending on `request.stream`.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the request and return the raw body text.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

/// Reqwest-backed transport against an OpenAI-style endpoint.
#[derive(Clone)]
pub struct HttpChatTransport {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl HttpChatTransport {
    /// Create a transport with the given configuration.
    pub fn new(config: ProviderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    tools: &'a [ToolDefinition],
    stream: bool,
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    #[instrument(skip(self, request), fields(model = %self.config.model, stream = request.stream))]
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let body = WireRequest {
            model: &self.config.model,
            messages: &request.messages,
            tools: &request.tools,
            stream: request.stream,
        };

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 => ProviderError::Authentication(error_text),
                429 => ProviderError::RateLimited(error_text),
                _ => ProviderError::Provider(format!("API error {status}: {error_text}")),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = ChatRequest::new(vec![ChatMessage::user("hi")])
            .with_tools(vec![ToolDefinition::function(
                "lookup_order",
                "Look up an order",
                json!({"type": "object"}),
            )])
            .with_stream(true);

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.tools.len(), 1);
        assert!(request.stream);
    }

    #[test]
    fn test_wire_request_omits_empty_tools() {
        let messages = vec![ChatMessage::user("hi")];
        let body = WireRequest {
            model: "gpt-4",
            messages: &messages,
            tools: &[],
            stream: false,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("tools").is_none());
        assert_eq!(value["model"], "gpt-4");
    }

    #[test]
    fn test_transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpChatTransport>();
    }
}
