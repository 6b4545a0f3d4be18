//! # intent - Intent Classification for the Storefront Copilot
//!
//! Deterministic, rule-based classification of short admin commands
//! ("refund order 123", "what's low on stock?") into a closed intent
//! taxonomy, plus the context aggregation consumed by intent handlers.
//!
//! # Overview
//!
//! Classification is a pure function over the registered scorer set:
//!
//! 1. An explicit override in the context short-circuits scoring.
//! 2. Input is normalized (lowercase, trim, length-capped).
//! 3. Every registered [`IntentScorer`] produces a non-negative score.
//! 4. The strictly highest score wins; ties among positive scores break
//!    to the lexicographically smallest intent name.
//! 5. No positive score at all resolves to [`Intent::Unknown`].
//!
//! # Quick Start
//!
//! ```rust
//! use intent::{HandlerContext, Intent, IntentClassifier, PhraseScorer};
//!
//! let classifier = IntentClassifier::new()
//!     .with_scorer(PhraseScorer::new(
//!         Intent::OrderRefund,
//!         &["refund", "money back", "return order"],
//!     ));
//!
//! let ctx = HandlerContext::new("Please refund my order");
//! assert_eq!(classifier.classify("Please refund my order", &ctx), Intent::OrderRefund);
//! ```
//!
//! # Module Organization
//!
//! - [`intent`](crate::intent) - The closed intent enumeration
//! - [`scorer`] - Phrase-list scorers with word-boundary matching
//! - [`classifier`] - The scorer registry and resolution algorithm
//! - [`context`] - Handler context and context-provider aggregation

pub mod classifier;
pub mod context;
pub mod intent;
pub mod scorer;

pub use classifier::{ClassificationObserver, IntentClassifier};
pub use context::{ContextAggregator, ContextProvider, HandlerContext};
pub use intent::Intent;
pub use scorer::{IntentScorer, PhraseScorer};
