//! crates/mindmate_core/src/classifier.rs
//!
//! Maps free text to an emotion label and an intent.
//!
//! The emotion starts from the word-list polarity with the chat thresholds and is
//! then overridden by negation patterns ("not happy", "no longer sad"). The intent
//! comes from an ordered table of phrase rules where the first match wins; the
//! phrase sets overlap, so the table order must not change.

use crate::domain::{ClassificationContext, Intent, Mood};
use crate::polarity;
use regex::Regex;
use std::sync::LazyLock;

/// Emotion threshold used for chat messages.
pub const CHAT_THRESHOLD: f64 = 0.3;

const NEGATABLE_POSITIVE: &[&str] = &[
    "happy", "good", "great", "excited", "okay", "ok", "fine", "positive", "calm", "content",
];

const NEGATABLE_NEGATIVE: &[&str] = &[
    "sad", "down", "depressed", "anxious", "angry", "stressed", "worried", "upset",
];

/// Ordered intent rules. Matching is substring containment on lowercased text.
const INTENT_RULES: &[(Intent, &[&str])] = &[
    (
        Intent::Achievement,
        &[
            "i made",
            "i built",
            "i created",
            "i achieved",
            "i accomplished",
            "promotion",
            "got hired",
            "won",
            "passed",
            "nailed it",
            "big achievement",
            "proud of",
            "shipped",
        ],
    ),
    (Intent::Gratitude, &["thank you", "thanks", "appreciate it", "grateful"]),
    (Intent::Apology, &["sorry", "apologies", "my fault", "apologize"]),
    (Intent::Anger, &["angry", "mad", "furious", "pissed", "rage"]),
    (
        Intent::Tiredness,
        &["tired", "exhausted", "drained", "fatigued", "sleepy", "burnt out", "burned out"],
    ),
    (
        Intent::Overwhelm,
        &["overwhelmed", "too much", "can\u{2019}t handle", "cant handle", "overloaded"],
    ),
    (
        Intent::Confusion,
        &["confused", "don\u{2019}t know", "dont know", "unsure", "uncertain"],
    ),
    (Intent::Loneliness, &["lonely", "alone", "isolated"]),
    (Intent::Anxiety, &["anxious", "anxiety", "worried", "stress", "stressed"]),
    (Intent::Journal, &["journal", "write", "diary", "journaling", "notes"]),
    (Intent::Breathing, &["breathe", "breathing", "grounding", "relax", "calm down"]),
    (
        Intent::Capability,
        &[
            "who are you",
            "what are you",
            "what can you do",
            "help me",
            "how can you help",
            "what can i do",
        ],
    ),
    (
        Intent::Greet,
        &["hello", "hi", "hey", "good morning", "good evening", "good afternoon"],
    ),
];

static NEGATED_POSITIVE: LazyLock<Regex> = LazyLock::new(|| negation_pattern(NEGATABLE_POSITIVE));
static NEGATED_NEGATIVE: LazyLock<Regex> = LazyLock::new(|| negation_pattern(NEGATABLE_NEGATIVE));

/// Builds one alternation covering "not X", "not so X", "not feeling X",
/// "don't feel X", "do not feel X" and "no longer (feel|feeling) X".
fn negation_pattern(terms: &[&str]) -> Regex {
    let terms = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(
        r"\b(?:not (?:so |that )?|not feeling (?:so |that )?|don't feel (?:so |that )?|do not feel (?:so |that )?|no longer (?:feel(?:ing)? )?)(?:{})\b",
        terms
    );
    Regex::new(&pattern).expect("negation pattern is valid")
}

pub(crate) fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}

/// Emotion from polarity alone, using the chat thresholds.
pub fn base_emotion(text: &str) -> Mood {
    Mood::from_polarity(polarity::polarity(text), CHAT_THRESHOLD)
}

/// Classifies `text` into an emotion and an intent. Never fails.
pub fn analyze(text: &str) -> ClassificationContext {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return ClassificationContext::default();
    }

    let mut emotion = base_emotion(&text);
    if NEGATED_POSITIVE.is_match(&text) {
        emotion = Mood::Negative;
    } else if NEGATED_NEGATIVE.is_match(&text) {
        // A negated negative reads as relief, not as a positive mood.
        emotion = Mood::Neutral;
    }

    let intent = INTENT_RULES
        .iter()
        .find(|(_, phrases)| contains_any(&text, phrases))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::None);

    ClassificationContext { emotion, intent }
}

/// Classifies a chat message. An explicit "not angry" clears both the
/// anger intent and the emotion.
pub fn analyze_chat_message(text: &str) -> ClassificationContext {
    if text.to_lowercase().contains("not angry") {
        return ClassificationContext::default();
    }
    analyze(text)
}
