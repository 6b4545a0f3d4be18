//! Handler context and context-provider aggregation.
//!
//! A [`HandlerContext`] is assembled fresh for every engine invocation from
//! the caller's input plus the merged output of registered
//! [`ContextProvider`]s. Providers merge in registration order and later
//! providers win on key collision. Handlers read the context; only the
//! engine writes it.

use crate::intent::Intent;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Per-invocation context handed to intent handlers.
#[derive(Debug, Clone, Default)]
pub struct HandlerContext {
    /// The raw user input this invocation is serving.
    pub input: String,

    /// Explicit intent override; short-circuits classification when present.
    pub intent_override: Option<Intent>,

    /// Store metadata contributed by a provider (name, currency, plan, ...).
    pub store: Option<Value>,

    /// Acting admin user contributed by a provider.
    pub user: Option<Value>,

    /// Recently touched records (orders, customers) for grounding.
    pub recent_records: Vec<Value>,

    /// Tool names a provider suggests advertising to the model.
    pub suggested_tools: Vec<String>,

    /// Everything else providers contribute, keyed by provider-chosen names.
    pub extra: Map<String, Value>,
}

impl HandlerContext {
    /// Create a context for the given input with nothing else set.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Set the explicit intent override.
    pub fn with_intent_override(mut self, intent: Intent) -> Self {
        self.intent_override = Some(intent);
        self
    }

    /// Merge one provider's output map into this context.
    ///
    /// Well-known keys are hoisted into their typed slots; anything else
    /// lands in `extra`. Later calls override earlier values.
    pub fn apply(&mut self, output: Map<String, Value>) {
        for (key, value) in output {
            match key.as_str() {
                "store" => self.store = Some(value),
                "user" => self.user = Some(value),
                "recent_records" => {
                    if let Value::Array(records) = value {
                        self.recent_records = records;
                    }
                }
                "suggested_tools" => {
                    if let Value::Array(names) = value {
                        self.suggested_tools = names
                            .into_iter()
                            .filter_map(|n| n.as_str().map(str::to_string))
                            .collect();
                    }
                }
                _ => {
                    self.extra.insert(key, value);
                }
            }
        }
    }
}

/// A source of context for handler invocations.
///
/// Providers that fail internally should return an empty map rather than
/// surface an error; context gathering is best-effort.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Produce this provider's contribution for the given invocation.
    async fn provide(&self, ctx: &HandlerContext) -> Map<String, Value>;
}

/// Ordered collection of context providers.
#[derive(Default)]
pub struct ContextAggregator {
    providers: Vec<Box<dyn ContextProvider>>,
}

impl ContextAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Registration order is merge order.
    pub fn register(&mut self, provider: Box<dyn ContextProvider>) {
        self.providers.push(provider);
    }

    /// Run every provider in registration order and merge the results into
    /// the context. Later providers override earlier ones on collision.
    pub async fn build(&self, ctx: &mut HandlerContext) {
        for provider in &self.providers {
            let output = provider.provide(ctx).await;
            ctx.apply(output);
        }
    }
}
