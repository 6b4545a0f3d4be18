//! Phrase scorers.
//!
//! A scorer assigns a non-negative match strength for one intent against
//! normalized input. The stock implementation counts word-boundary phrase
//! matches: "refund" scores on "please refund my order" but not on
//! "nonrefundable order".

use crate::context::HandlerContext;
use crate::intent::Intent;
use regex::Regex;

/// A rule that scores normalized text for one intent.
pub trait IntentScorer: Send + Sync {
    /// The intent this scorer argues for.
    fn intent(&self) -> Intent;

    /// Match strength of `text` for this scorer's intent.
    ///
    /// `text` is already normalized (lowercase, trimmed, length-capped).
    fn score(&self, text: &str, ctx: &HandlerContext) -> u32;
}

/// Scores by counting word-boundary occurrences of a fixed phrase list.
pub struct PhraseScorer {
    intent: Intent,
    patterns: Vec<Regex>,
}

impl PhraseScorer {
    /// Build a scorer for `intent` from a phrase list.
    ///
    /// Phrases are matched case-insensitively against pre-lowercased input,
    /// so they should be given in lowercase. Each phrase is wrapped in word
    /// boundaries; a phrase embedded in a longer word does not match.
    pub fn new<S: AsRef<str>>(intent: Intent, phrases: &[S]) -> Self {
        let patterns = phrases
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .map(|phrase| {
                // Escaped phrases are valid patterns by construction.
                Regex::new(&word_bounded(phrase)).expect("escaped phrase pattern")
            })
            .collect();

        Self { intent, patterns }
    }
}

/// Escape a phrase and anchor it with `\b` on the sides that start or end
/// with a word character. A `\b` next to punctuation can never match, so
/// phrases like "q4 (gross)" are anchored on the left only.
fn word_bounded(phrase: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let mut pattern = String::new();
    if phrase.chars().next().is_some_and(is_word) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(phrase));
    if phrase.chars().last().is_some_and(is_word) {
        pattern.push_str(r"\b");
    }
    pattern
}

impl IntentScorer for PhraseScorer {
    fn intent(&self) -> Intent {
        self.intent
    }

    fn score(&self, text: &str, _ctx: &HandlerContext) -> u32 {
        self.patterns
            .iter()
            .map(|pattern| pattern.find_iter(text).count() as u32)
            .sum()
    }
}
