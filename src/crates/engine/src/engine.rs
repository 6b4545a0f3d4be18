//! The engine facade.
//!
//! One invocation is: classify the input, gather context, route to the
//! first handler that claims the intent (or the fallback), enforce the
//! credential precondition, run the handler, record the session, and
//! return the stable [`EngineResult`] envelope. `run` itself never
//! returns `Err`; fatal handler errors become failed envelopes.

use crate::error::EngineError;
use crate::handler::{FallbackHandler, IntentHandler};
use crate::result::EngineResult;
use crate::session::{MemorySessionStore, SessionStore};
use intent::{ContextAggregator, ContextProvider, HandlerContext, Intent, IntentClassifier};
use provider::ProviderConfig;
use std::sync::Arc;
use tracing::{debug, warn};

/// The intent engine: classifier, context providers, handler routing
/// table, and session recording behind one entry point.
pub struct Engine {
    classifier: IntentClassifier,
    aggregator: ContextAggregator,
    handlers: Vec<Box<dyn IntentHandler>>,
    fallback: Box<dyn IntentHandler>,
    config: ProviderConfig,
    session: Arc<dyn SessionStore>,
}

impl Engine {
    /// Create an engine with no handlers and the default fallback.
    pub fn new(classifier: IntentClassifier, config: ProviderConfig) -> Self {
        Self {
            classifier,
            aggregator: ContextAggregator::new(),
            handlers: Vec::new(),
            fallback: Box::new(FallbackHandler::new()),
            config,
            session: Arc::new(MemorySessionStore::new()),
        }
    }

    /// Register a handler. Registration order is routing priority.
    pub fn with_handler(mut self, handler: impl IntentHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Replace the fallback handler.
    pub fn with_fallback(mut self, fallback: impl IntentHandler + 'static) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    /// Register a context provider.
    pub fn with_context_provider(mut self, provider: impl ContextProvider + 'static) -> Self {
        self.aggregator.register(Box::new(provider));
        self
    }

    /// Replace the session store.
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session = store;
        self
    }

    /// Serve one plain input with no overrides.
    pub async fn run(&self, input: &str) -> EngineResult {
        self.run_with_context(HandlerContext::new(input)).await
    }

    /// Serve one invocation with a pre-built context (overrides, caller
    /// metadata).
    pub async fn run_with_context(&self, mut ctx: HandlerContext) -> EngineResult {
        let intent = self.classifier.classify(&ctx.input, &ctx);
        self.aggregator.build(&mut ctx).await;

        let handler = self.select_handler(intent);

        // The credential check happens before the handler can touch the
        // transport; the fallback path stays available without one.
        if handler.requires_provider() && !self.config.has_credential() {
            warn!(intent = %intent, "rejecting invocation: no credential configured");
            let err = EngineError::Authentication("no credential configured".to_string());
            let result = EngineResult::from_error(intent, &err);
            self.session.record(intent, &ctx.input, &result).await;
            return result;
        }

        debug!(intent = %intent, "dispatching to handler");
        let result = match handler.handle(intent, &ctx).await {
            Ok(result) => result,
            Err(err) => {
                warn!(intent = %intent, error = %err, "handler failed");
                EngineResult::from_error(intent, &err)
            }
        };

        self.session.record(intent, &ctx.input, &result).await;
        result
    }

    fn select_handler(&self, intent: Intent) -> &dyn IntentHandler {
        self.handlers
            .iter()
            .find(|h| h.can_handle(intent))
            .map(|h| h.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        serves: Intent,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl IntentHandler for CountingHandler {
        fn can_handle(&self, intent: Intent) -> bool {
            intent == self.serves
        }

        async fn handle(
            &self,
            intent: Intent,
            _ctx: &HandlerContext,
        ) -> Result<EngineResult, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(EngineResult::ok(intent, "handled"))
        }
    }

    fn refund_classifier() -> IntentClassifier {
        IntentClassifier::new().with_scorer(intent::PhraseScorer::new(
            Intent::OrderRefund,
            &["refund"],
        ))
    }

    #[tokio::test]
    async fn test_routes_to_first_matching_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = Engine::new(refund_classifier(), ProviderConfig::new("key", "url", "m"))
            .with_handler(CountingHandler {
                serves: Intent::OrderRefund,
                calls: calls.clone(),
            });

        let result = engine.run("refund order 55").await;

        assert!(result.success);
        assert_eq!(result.intent(), Some("ORDER_REFUND"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unmatched_intent_falls_back() {
        let engine = Engine::new(refund_classifier(), ProviderConfig::new("key", "url", "m"));

        let result = engine.run("total nonsense").await;

        assert!(result.success);
        assert_eq!(result.intent(), Some("UNKNOWN"));
        assert!(result.data.contains_key("suggested_intents"));
    }

    #[tokio::test]
    async fn test_missing_credential_rejects_before_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = Engine::new(refund_classifier(), ProviderConfig::new("", "url", "m"))
            .with_handler(CountingHandler {
                serves: Intent::OrderRefund,
                calls: calls.clone(),
            });

        let result = engine.run("refund order 55").await;

        assert!(!result.success);
        assert_eq!(result.status, 401);
        assert_eq!(result.data["code"], json!("auth_error"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fallback_works_without_credential() {
        let engine = Engine::new(refund_classifier(), ProviderConfig::new("", "url", "m"));

        let result = engine.run("total nonsense").await;
        assert!(result.success);
        assert_eq!(result.intent(), Some("UNKNOWN"));
    }

    #[tokio::test]
    async fn test_sessions_are_recorded() {
        let store = Arc::new(MemorySessionStore::new());
        let engine = Engine::new(refund_classifier(), ProviderConfig::new("key", "url", "m"))
            .with_session_store(store.clone());

        engine.run("total nonsense").await;

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].intent, Intent::Unknown);
        assert_eq!(records[0].input, "total nonsense");
    }
}
