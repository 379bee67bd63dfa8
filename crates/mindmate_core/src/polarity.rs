//! crates/mindmate_core/src/polarity.rs
//!
//! Word-list sentiment scoring. Counts tokens found in a fixed positive set
//! and a fixed negative set and normalises the difference into [-1.0, 1.0].

use crate::domain::Mood;
use regex::Regex;
use std::sync::LazyLock;

/// Mood threshold used when scoring journal entries.
pub const JOURNAL_THRESHOLD: f64 = 0.1;

const POSITIVE_WORDS: &[&str] = &[
    "happy",
    "joy",
    "joyful",
    "good",
    "great",
    "love",
    "excited",
    "wonderful",
    "delighted",
    "content",
    "fortunate",
    "grateful",
    "calm",
];

const NEGATIVE_WORDS: &[&str] = &[
    "sad",
    "depressed",
    "down",
    "angry",
    "frustrated",
    "unhappy",
    "anxious",
    "nervous",
    "worried",
    "bad",
    "upset",
    "fear",
    "lonely",
    "hopeless",
];

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("static regex"));

/// Returns the bounded polarity of `text`.
///
/// `(pos - neg) / (pos + neg)` when any listed word occurs, otherwise exactly `0.0`.
pub fn polarity(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let (mut pos, mut neg) = (0u32, 0u32);
    for token in WORD.find_iter(&lowered).map(|m| m.as_str()) {
        if POSITIVE_WORDS.contains(&token) {
            pos += 1;
        } else if NEGATIVE_WORDS.contains(&token) {
            neg += 1;
        }
    }

    let total = pos + neg;
    if total == 0 {
        return 0.0;
    }
    (f64::from(pos) - f64::from(neg)) / f64::from(total)
}

/// Scores a journal entry, returning its mood and polarity.
pub fn analyze_entry(text: &str) -> (Mood, f64) {
    let score = polarity(text);
    (Mood::from_polarity(score, JOURNAL_THRESHOLD), score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_positive_words_score_one() {
        assert_eq!(analyze_entry("happy happy joy"), (Mood::Positive, 1.0));
        assert_eq!(analyze_entry("Grateful, CALM and content."), (Mood::Positive, 1.0));
    }

    #[test]
    fn only_negative_words_score_minus_one() {
        assert_eq!(analyze_entry("sad and lonely"), (Mood::Negative, -1.0));
        assert_eq!(analyze_entry("Worried. Upset. Hopeless!"), (Mood::Negative, -1.0));
    }

    #[test]
    fn unlisted_words_score_zero() {
        assert_eq!(analyze_entry("I went to the shop"), (Mood::Neutral, 0.0));
        assert_eq!(analyze_entry(""), (Mood::Neutral, 0.0));
    }

    #[test]
    fn balanced_text_is_neutral() {
        assert_eq!(analyze_entry("good day, bad night"), (Mood::Neutral, 0.0));
    }

    #[test]
    fn mixed_text_uses_the_ratio() {
        let (mood, score) = analyze_entry("happy and great but a bit sad");
        assert!((score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(mood, Mood::Positive);
    }

    #[test]
    fn tokens_match_whole_words_only() {
        // "sadness" and "goodbye" are not in either list.
        assert_eq!(polarity("sadness and goodbye"), 0.0);
    }
}
