//! Intent handlers.
//!
//! A handler owns one slice of the taxonomy: it declares which intents it
//! serves, which tools to advertise, and how to drive the conversation.
//! [`ConversationHandler`] is the standard provider-backed implementation;
//! [`FallbackHandler`] serves everything nothing else claimed, without ever
//! touching the provider.

use crate::conversation::Conversation;
use crate::error::EngineError;
use crate::result::EngineResult;
use async_trait::async_trait;
use intent::{HandlerContext, Intent};
use provider::ChatMessage;
use serde_json::{json, Map, Value};
use tracing::debug;

/// One handler in the engine's routing table.
#[async_trait]
pub trait IntentHandler: Send + Sync {
    /// Whether this handler serves the given intent.
    fn can_handle(&self, intent: Intent) -> bool;

    /// Whether handling contacts the provider. The engine only enforces
    /// the credential precondition for handlers that do.
    fn requires_provider(&self) -> bool {
        true
    }

    /// Serve one invocation.
    async fn handle(
        &self,
        intent: Intent,
        ctx: &HandlerContext,
    ) -> Result<EngineResult, EngineError>;
}

/// The standard provider-backed handler: a system prompt, a set of served
/// intents, a set of suggested tools, and the conversation loop.
pub struct ConversationHandler {
    intents: Vec<Intent>,
    system_prompt: String,
    suggested_tools: Vec<String>,
    conversation: Conversation,
}

impl ConversationHandler {
    /// Create a handler serving the given intents.
    pub fn new(
        intents: Vec<Intent>,
        system_prompt: impl Into<String>,
        conversation: Conversation,
    ) -> Self {
        Self {
            intents,
            system_prompt: system_prompt.into(),
            suggested_tools: Vec::new(),
            conversation,
        }
    }

    /// Set the tools this handler advertises.
    pub fn with_suggested_tools<S: Into<String>>(mut self, tools: Vec<S>) -> Self {
        self.suggested_tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Handler suggestions first, then context suggestions, first
    /// occurrence wins.
    fn combined_tools(&self, ctx: &HandlerContext) -> Vec<String> {
        let mut tools = self.suggested_tools.clone();
        for name in &ctx.suggested_tools {
            if !tools.contains(name) {
                tools.push(name.clone());
            }
        }
        tools
    }

    /// System prompt, a context summary when any context was gathered,
    /// then the user input.
    fn build_messages(&self, ctx: &HandlerContext) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(&self.system_prompt)];

        if let Some(summary) = context_summary(ctx) {
            messages.push(ChatMessage::system(format!("Context: {summary}")));
        }

        messages.push(ChatMessage::user(&ctx.input));
        messages
    }
}

#[async_trait]
impl IntentHandler for ConversationHandler {
    fn can_handle(&self, intent: Intent) -> bool {
        self.intents.contains(&intent)
    }

    async fn handle(
        &self,
        intent: Intent,
        ctx: &HandlerContext,
    ) -> Result<EngineResult, EngineError> {
        let messages = self.build_messages(ctx);
        let tools = self.combined_tools(ctx);

        debug!(intent = %intent, tools = ?tools, "running conversation handler");
        let outcome = self.conversation.run(messages, &tools).await?;

        Ok(EngineResult::ok(intent, outcome.message)
            .with_field("turns", json!(outcome.turns))
            .with_field("usage", Value::Object(outcome.usage)))
    }
}

/// Serves anything no other handler claimed. Performs no provider call and
/// never fails; the caller gets back the list of intents the engine does
/// understand.
pub struct FallbackHandler {
    known: Vec<Intent>,
}

impl FallbackHandler {
    /// A fallback advertising every non-Unknown intent.
    pub fn new() -> Self {
        Self {
            known: Intent::ALL
                .into_iter()
                .filter(|i| *i != Intent::Unknown)
                .collect(),
        }
    }

    /// A fallback advertising a specific intent list.
    pub fn with_known_intents(intents: Vec<Intent>) -> Self {
        Self { known: intents }
    }
}

impl Default for FallbackHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentHandler for FallbackHandler {
    fn can_handle(&self, _intent: Intent) -> bool {
        true
    }

    fn requires_provider(&self) -> bool {
        false
    }

    async fn handle(
        &self,
        _intent: Intent,
        _ctx: &HandlerContext,
    ) -> Result<EngineResult, EngineError> {
        let names: Vec<&str> = self.known.iter().map(Intent::as_str).collect();
        let message = format!(
            "I couldn't determine what you need. I can help with: {}.",
            names.join(", ")
        );

        Ok(EngineResult::ok(Intent::Unknown, message)
            .with_field("suggested_intents", json!(names)))
    }
}

/// Render the gathered context slots as one JSON object, or `None` when
/// nothing was gathered.
fn context_summary(ctx: &HandlerContext) -> Option<String> {
    let mut summary = Map::new();

    if let Some(store) = &ctx.store {
        summary.insert("store".to_string(), store.clone());
    }
    if let Some(user) = &ctx.user {
        summary.insert("user".to_string(), user.clone());
    }
    if !ctx.recent_records.is_empty() {
        summary.insert(
            "recent_records".to_string(),
            Value::Array(ctx.recent_records.clone()),
        );
    }
    for (key, value) in &ctx.extra {
        summary.insert(key.clone(), value.clone());
    }

    if summary.is_empty() {
        None
    } else {
        Some(Value::Object(summary).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fallback_lists_known_intents_and_never_fails() {
        let handler = FallbackHandler::new();
        let ctx = HandlerContext::new("gibberish");

        assert!(handler.can_handle(Intent::Unknown));
        assert!(handler.can_handle(Intent::OrderRefund));
        assert!(!handler.requires_provider());

        let result = handler.handle(Intent::Unknown, &ctx).await.unwrap();
        assert!(result.success);
        assert_eq!(result.intent(), Some("UNKNOWN"));
        assert!(result.message().unwrap().contains("ORDER_REFUND"));

        let suggested = result.data["suggested_intents"].as_array().unwrap();
        assert_eq!(suggested.len(), Intent::ALL.len() - 1);
    }

    #[test]
    fn test_context_summary_empty_when_nothing_gathered() {
        let ctx = HandlerContext::new("hello");
        assert!(context_summary(&ctx).is_none());
    }

    #[test]
    fn test_context_summary_includes_slots_and_extras() {
        let mut ctx = HandlerContext::new("hello");
        ctx.store = Some(json!({"name": "Acme"}));
        ctx.extra.insert("region".to_string(), json!("eu"));

        let summary = context_summary(&ctx).unwrap();
        let parsed: Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(parsed["store"]["name"], json!("Acme"));
        assert_eq!(parsed["region"], json!("eu"));
    }
}
