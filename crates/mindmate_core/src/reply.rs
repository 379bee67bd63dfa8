//! crates/mindmate_core/src/reply.rs
//!
//! Chooses the assistant's reply for a classified message.
//!
//! A `ReplyStrategy` either always answers locally from the canned rule table, or
//! first asks a generative text service (bounded by a timeout) and falls back to
//! the canned rules on any failure. Failures are logged and never returned.

use crate::classifier::contains_any;
use crate::domain::{ClassificationContext, ConversationTurn, Intent, Mood, ReplyStyle, Role};
use crate::ports::{GenerativeTextService, PortError};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, warn};

/// Reply for empty or whitespace-only input.
pub const EMPTY_INPUT_PROMPT: &str = "I'm here to listen. How are you feeling today?";

/// How many prior turns are forwarded to the generative service.
pub const HISTORY_WINDOW: usize = 10;

const CONCISE_INSTRUCTIONS: &str = "You are MindMate, an empathetic mental wellness companion. \
Be warm, supportive, non-judgmental. Keep replies concise (1-2 short paragraphs). \
Offer gentle suggestions like journaling or breathing, and ask at most one follow-up question.";

const DETAILED_INSTRUCTIONS: &str = "You are MindMate, an empathetic mental wellness companion. \
Be warm, validating, and human-like. Write a fuller response (2-4 short paragraphs). \
1) Acknowledge and reflect the user's message in your own words. \
2) Offer 1-2 practical, gentle suggestions (e.g., journaling prompts, breathing, small next steps). \
3) End with exactly one open-ended question to keep the conversation going. \
Avoid medical diagnoses or judgments. Keep language simple, hopeful, and grounded. \
If appropriate, connect to recent parts of the conversation without repeating the same line.";

//=========================================================================================
// Canned Replies
//=========================================================================================

const SAD_WORDS: &[&str] = &["sad", "down", "depressed", "blue"];
const HAPPY_WORDS: &[&str] = &[
    "happy", "joy", "excited", "great", "good", "awesome", "fantastic", "grateful",
];

static QUESTION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\b(what|why|how|when|where|who|can|should|could|would|is|are|do|does)\b")
        .expect("static regex")
});

/// What makes a canned rule fire.
#[derive(Debug, Clone, Copy)]
enum Trigger {
    Intent(Intent),
    WordsOrEmotion(&'static [&'static str], Mood),
    Emotion(Mood),
    Question,
}

/// Checked top to bottom; the first trigger that fires supplies the reply.
const CANNED_RULES: &[(Trigger, &str)] = &[
    (
        Trigger::Intent(Intent::Achievement),
        "That’s amazing — congratulations! What part of this achievement makes you most proud?",
    ),
    (
        Trigger::Intent(Intent::Gratitude),
        "You’re very welcome. I’m glad to be here for you.",
    ),
    (
        Trigger::Intent(Intent::Apology),
        "It’s okay to make mistakes. What would help you be kinder to yourself right now?",
    ),
    (
        Trigger::Intent(Intent::Anger),
        "Anger can feel intense. Would a short grounding exercise help you release some of that tension?",
    ),
    (
        Trigger::Intent(Intent::Tiredness),
        "You sound worn out. A quick rest, water, or a short walk might help. Want to plan a tiny break?",
    ),
    (
        Trigger::Intent(Intent::Overwhelm),
        "Feeling overwhelmed is tough. Let’s break things into one small next step—what’s the first doable action?",
    ),
    (
        Trigger::Intent(Intent::Confusion),
        "It’s okay to not have all the answers. What options are you considering right now?",
    ),
    (
        Trigger::Intent(Intent::Loneliness),
        "You’re not alone. I’m here with you. Would reaching out to someone or journaling help right now?",
    ),
    (
        Trigger::Intent(Intent::Anxiety),
        "Deep breathing can help. Want me to guide you through a short exercise?",
    ),
    (
        Trigger::WordsOrEmotion(SAD_WORDS, Mood::Negative),
        "I'm here for you. Would you like to try a breathing exercise or write a journal entry?",
    ),
    (
        Trigger::WordsOrEmotion(HAPPY_WORDS, Mood::Positive),
        "That's wonderful! Want to share what made your day so good?",
    ),
    (
        Trigger::Intent(Intent::Journal),
        "Sure! Head to the Journal tab and write down your thoughts.",
    ),
    (
        Trigger::Intent(Intent::Breathing),
        "Try this: inhale for 4, hold for 4, exhale for 6 — repeat 4 times. How do you feel after that?",
    ),
    (
        Trigger::Intent(Intent::Capability),
        "I’m MindMate—here to listen, reflect, and offer gentle suggestions like journaling or simple breathing exercises. What would help most right now?",
    ),
    (
        Trigger::Intent(Intent::Greet),
        "Hello! How are you feeling right now?",
    ),
    (
        Trigger::Emotion(Mood::Positive),
        "I love your positive energy. Would you like to capture this in your journal?",
    ),
    (
        Trigger::Emotion(Mood::Negative),
        "That sounds tough. I'm here for you. Want to talk more or write about it?",
    ),
    (
        Trigger::Question,
        "That’s a thoughtful question. What outcome would feel right for you? Sometimes writing your thoughts helps clarify.",
    ),
];

const GENERIC_REPLY: &str = "I'm listening. Tell me a bit more about what’s on your mind.";

fn is_question_like(text: &str) -> bool {
    text.contains('?') || QUESTION_START.is_match(text)
}

impl Trigger {
    fn fires(&self, text: &str, ctx: &ClassificationContext) -> bool {
        match *self {
            Trigger::Intent(intent) => ctx.intent == intent,
            Trigger::WordsOrEmotion(words, mood) => contains_any(text, words) || ctx.emotion == mood,
            Trigger::Emotion(mood) => ctx.emotion == mood,
            Trigger::Question => is_question_like(text),
        }
    }
}

/// Picks the canned reply for `user_input` given its classification.
///
/// Leading whitespace is kept, so the question-word check only matches a
/// message that starts with the word.
pub fn canned_reply(user_input: &str, ctx: &ClassificationContext) -> &'static str {
    let text = user_input.to_lowercase();
    if text.trim().is_empty() {
        return EMPTY_INPUT_PROMPT;
    }

    CANNED_RULES
        .iter()
        .find(|(trigger, _)| trigger.fires(&text, ctx))
        .map(|(_, reply)| *reply)
        .unwrap_or(GENERIC_REPLY)
}

//=========================================================================================
// Reply Strategy
//=========================================================================================

/// The result of asking the generative service for a reply.
#[derive(Debug)]
pub enum RemoteOutcome {
    Reply(String),
    Failed(PortError),
}

/// How replies are produced: purely from the canned rules, or by a remote
/// generative service with the canned rules as fallback.
#[derive(Clone)]
pub enum ReplyStrategy {
    Local,
    Remote {
        service: Arc<dyn GenerativeTextService>,
        timeout: Duration,
    },
}

impl ReplyStrategy {
    pub fn remote(service: Arc<dyn GenerativeTextService>, timeout: Duration) -> Self {
        ReplyStrategy::Remote { service, timeout }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ReplyStrategy::Remote { .. })
    }

    /// Builds the messages sent to the generative service: the style's system
    /// instruction, the most recent history turns, then the user's message.
    pub fn build_prompt(
        user_input: &str,
        history: &[ConversationTurn],
        style: ReplyStyle,
    ) -> Vec<ConversationTurn> {
        let instructions = match style {
            ReplyStyle::Concise => CONCISE_INSTRUCTIONS,
            ReplyStyle::Detailed => DETAILED_INSTRUCTIONS,
        };

        let start = history.len().saturating_sub(HISTORY_WINDOW);
        let mut messages = Vec::with_capacity(HISTORY_WINDOW + 2);
        messages.push(ConversationTurn::system(instructions));
        messages.extend(
            history[start..]
                .iter()
                .filter(|turn| turn.role != Role::System && !turn.content.is_empty())
                .cloned(),
        );
        messages.push(ConversationTurn::user(user_input));
        messages
    }

    /// Asks the remote service for a reply. Returns `None` for the local strategy.
    pub async fn request_remote(
        &self,
        user_input: &str,
        history: &[ConversationTurn],
        style: ReplyStyle,
    ) -> Option<RemoteOutcome> {
        let ReplyStrategy::Remote { service, timeout } = self else {
            return None;
        };

        let messages = Self::build_prompt(user_input, history, style);
        let outcome = match tokio::time::timeout(*timeout, service.complete(&messages)).await {
            Err(_) => RemoteOutcome::Failed(PortError::Timeout(*timeout)),
            Ok(Err(e)) => RemoteOutcome::Failed(e),
            Ok(Ok(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    RemoteOutcome::Failed(PortError::Malformed("empty completion".to_string()))
                } else {
                    RemoteOutcome::Reply(text.to_string())
                }
            }
        };
        Some(outcome)
    }

    /// Produces a non-empty reply. Remote failures fall back to the canned rules.
    pub async fn reply(
        &self,
        user_input: &str,
        ctx: &ClassificationContext,
        history: &[ConversationTurn],
        style: ReplyStyle,
    ) -> String {
        if user_input.trim().is_empty() {
            return EMPTY_INPUT_PROMPT.to_string();
        }

        match self.request_remote(user_input, history, style).await {
            Some(RemoteOutcome::Reply(text)) => return text,
            Some(RemoteOutcome::Failed(e)) => {
                if let ReplyStrategy::Remote { service, .. } = self {
                    warn!(
                        "Generative reply from {} failed, using canned reply: {}",
                        service.provider_name(),
                        e
                    );
                }
            }
            None => debug!("No generative service configured; using canned reply."),
        }

        canned_reply(user_input, ctx).to_string()
    }
}
