//! The scorer registry and resolution algorithm.
//!
//! Resolution is deterministic and never fails: an explicit override wins,
//! otherwise the strictly highest scorer wins, positive ties break to the
//! lexicographically smallest intent name, and the all-zero case resolves to
//! [`Intent::Unknown`].

use crate::context::HandlerContext;
use crate::intent::Intent;
use crate::scorer::IntentScorer;
use std::collections::BTreeMap;
use tracing::debug;

/// Default cap on classified input, in Unicode code points.
///
/// Bounds worst-case regex cost against adversarially long input.
pub const DEFAULT_INPUT_CAP: usize = 10_000;

/// Observer notified after each resolution.
///
/// A side channel, not a control-flow dependency; invoked synchronously
/// after the intent is resolved.
pub trait ClassificationObserver: Send + Sync {
    /// Called with the resolved intent, the full score table, and the raw
    /// (pre-normalization) input.
    fn on_classified(&self, intent: Intent, scores: &BTreeMap<Intent, u32>, input: &str);
}

impl<F> ClassificationObserver for F
where
    F: Fn(Intent, &BTreeMap<Intent, u32>, &str) + Send + Sync,
{
    fn on_classified(&self, intent: Intent, scores: &BTreeMap<Intent, u32>, input: &str) {
        self(intent, scores, input)
    }
}

/// Registry of scorers plus the resolution algorithm.
///
/// Built once at startup and read-only afterwards; classification itself is
/// a pure function of the registry state and its arguments.
pub struct IntentClassifier {
    scorers: Vec<Box<dyn IntentScorer>>,
    input_cap: usize,
    observer: Option<Box<dyn ClassificationObserver>>,
}

impl IntentClassifier {
    /// Create an empty classifier with the default input cap.
    pub fn new() -> Self {
        Self {
            scorers: Vec::new(),
            input_cap: DEFAULT_INPUT_CAP,
            observer: None,
        }
    }

    /// Register a scorer.
    pub fn with_scorer(mut self, scorer: impl IntentScorer + 'static) -> Self {
        self.scorers.push(Box::new(scorer));
        self
    }

    /// Override the input cap (Unicode code points, not bytes).
    pub fn with_input_cap(mut self, cap: usize) -> Self {
        self.input_cap = cap;
        self
    }

    /// Attach an observer notified after each resolution.
    pub fn with_observer(mut self, observer: impl ClassificationObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Classify free text into the intent taxonomy.
    ///
    /// Never fails: absence of any match is [`Intent::Unknown`], not an
    /// error.
    pub fn classify(&self, input: &str, ctx: &HandlerContext) -> Intent {
        if let Some(intent) = ctx.intent_override {
            debug!(intent = %intent, "classification short-circuited by override");
            return intent;
        }

        let text = self.normalize(input);
        if text.is_empty() {
            return Intent::Unknown;
        }

        let mut scores: BTreeMap<Intent, u32> = BTreeMap::new();
        for scorer in &self.scorers {
            let score = scorer.score(&text, ctx);
            // A duplicate scorer for the same intent keeps the higher score.
            let entry = scores.entry(scorer.intent()).or_insert(0);
            *entry = (*entry).max(score);
        }

        let resolved = Self::resolve(&scores);
        debug!(intent = %resolved, ?scores, "intent resolved");

        if let Some(observer) = &self.observer {
            observer.on_classified(resolved, &scores, input);
        }

        resolved
    }

    fn normalize(&self, input: &str) -> String {
        let trimmed = input.trim().to_lowercase();
        if trimmed.chars().count() > self.input_cap {
            trimmed.chars().take(self.input_cap).collect()
        } else {
            trimmed
        }
    }

    fn resolve(scores: &BTreeMap<Intent, u32>) -> Intent {
        let best = scores.values().copied().max().unwrap_or(0);
        if best == 0 {
            return Intent::Unknown;
        }

        scores
            .iter()
            .filter(|(_, score)| **score == best)
            .map(|(intent, _)| *intent)
            .min_by_key(|intent| intent.as_str())
            .unwrap_or(Intent::Unknown)
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
