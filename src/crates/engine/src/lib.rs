//! # engine - The Intent Engine Facade
//!
//! Ties the workspace together: classified input is routed to an intent
//! handler, the handler drives a bounded tool-calling conversation against
//! the provider, and every invocation comes back as one stable
//! [`EngineResult`] envelope.
//!
//! # Overview
//!
//! One invocation flows through five stages:
//!
//! ```text
//! input ──▶ classify ──▶ gather context ──▶ route to handler
//!                                               │
//!                          ┌────────────────────┘
//!                          ▼
//!                 conversation loop ◀──▶ provider
//!                          │       ◀──▶ tool registry
//!                          ▼
//!                    EngineResult ──▶ session store
//! ```
//!
//! The loop is bounded (12 turns by default), cancellable at turn
//! boundaries, and feeds every recoverable tool failure back to the model
//! as a structured tool message. Fatal errors never escape as `Err` from
//! [`Engine::run`]; they become failed envelopes with HTTP-style statuses.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use engine::{ConversationHandler, Conversation, Engine};
//! use engine::tools::builtin_registry;
//! use intent::{Intent, IntentClassifier, PhraseScorer};
//! use provider::{HttpChatTransport, ProviderConfig};
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let config = ProviderConfig::new("sk-...", "https://api.openai.com/v1", "gpt-4o");
//! let transport = Arc::new(HttpChatTransport::new(config.clone()));
//! let registry = Arc::new(builtin_registry());
//!
//! let classifier = IntentClassifier::new()
//!     .with_scorer(PhraseScorer::new(Intent::OrderRefund, &["refund", "money back"]));
//!
//! let refunds = ConversationHandler::new(
//!     vec![Intent::OrderRefund],
//!     "You are a store admin assistant handling refunds.",
//!     Conversation::new(transport, registry, config.clone()),
//! )
//! .with_suggested_tools(vec!["lookup_order", "prepare_refund"]);
//!
//! let engine = Engine::new(classifier, config).with_handler(refunds);
//!
//! let result = engine.run("I need a refund for order 123").await;
//! assert_eq!(result.intent(), Some("ORDER_REFUND"));
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`engine`] - [`Engine`] facade and routing
//! - [`conversation`] - the bounded tool-calling loop and [`CancelFlag`]
//! - [`handler`] - [`IntentHandler`], [`ConversationHandler`], [`FallbackHandler`]
//! - [`result`] - the [`EngineResult`] envelope
//! - [`session`] - [`SessionStore`] and the in-memory implementation
//! - [`tools`] - built-in store tools
//! - [`error`] - [`EngineError`] taxonomy

pub mod conversation;
pub mod engine;
pub mod error;
pub mod handler;
pub mod result;
pub mod session;
pub mod tools;

pub use conversation::{CancelFlag, Conversation, ConversationOutcome};
pub use engine::Engine;
pub use error::EngineError;
pub use handler::{ConversationHandler, FallbackHandler, IntentHandler};
pub use result::EngineResult;
pub use session::{MemorySessionStore, SessionRecord, SessionStore};
