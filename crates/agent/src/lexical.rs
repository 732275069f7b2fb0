//! Lexical feature extraction: shallow surface features of the raw text.
//!
//! Total over every string input, including the empty string.

use crate::keywords::{self, Intent, Tone};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Tokens at which the complexity score saturates.
const COMPLEXITY_SATURATION_TOKENS: f64 = 100.0;

const BASE_SPECIFICITY: f64 = 0.5;
const SPECIFICITY_STEP: f64 = 0.1;

/// A run of sentence terminators counts as one delimiter.
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence break pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexicalFeatures {
    pub tokens: usize,
    pub sentences: usize,
    /// Never empty.
    pub intents: Vec<Intent>,
    pub complexity_score: f64,
    pub emotional_tone: Tone,
    pub specificity_level: f64,
    pub summary: String,
}

pub fn analyze(text: &str) -> LexicalFeatures {
    let lowered = text.to_lowercase();
    let tokens = token_count(text);
    let complexity = complexity_score(tokens);

    LexicalFeatures {
        tokens,
        sentences: sentence_count(text),
        intents: classify_intent(&lowered),
        complexity_score: complexity,
        emotional_tone: detect_tone(&lowered),
        specificity_level: assess_specificity(&lowered),
        summary: format!("Analyzed {tokens} tokens, complexity {complexity:.2}"),
    }
}

pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of segments left after splitting on terminator runs. Trailing and
/// empty segments count, so the result is at least 1.
pub fn sentence_count(text: &str) -> usize {
    SENTENCE_BREAK.find_iter(text).count() + 1
}

/// Linear in the token count, saturating at 1.0.
pub fn complexity_score(tokens: usize) -> f64 {
    (tokens as f64 / COMPLEXITY_SATURATION_TOKENS).min(1.0)
}

fn classify_intent(lowered: &str) -> Vec<Intent> {
    let intents = keywords::matching_tags(keywords::INTENT_FAMILIES, lowered);
    if intents.is_empty() {
        vec![Intent::General]
    } else {
        intents
    }
}

fn detect_tone(lowered: &str) -> Tone {
    keywords::first_match(keywords::TONE_FAMILIES, lowered).unwrap_or(Tone::Neutral)
}

fn assess_specificity(lowered: &str) -> f64 {
    let matched = keywords::matching_tags(keywords::SPECIFICITY_FAMILIES, lowered).len();
    (BASE_SPECIFICITY + SPECIFICITY_STEP * matched as f64).min(1.0)
}
