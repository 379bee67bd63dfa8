//! crates/mindmate_core/src/session.rs
//!
//! Per-session chat state and the one-time memory hint.

use crate::domain::{ClassificationContext, ConversationTurn, Intent, Mood};

/// Characters of the achievement message quoted in its memory hint.
const ACHIEVEMENT_SNIPPET_CHARS: usize = 80;

/// The state of one chat session. Not persisted; dropped when the session ends.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    pub history: Vec<ConversationTurn>,
    pub last_intent: Option<Intent>,
    pub last_emotion: Option<Mood>,
    /// The most recent message classified as an achievement.
    pub last_achievement: Option<String>,
    pub memory_hint_shown: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the classification of the latest user message.
    pub fn observe(&mut self, message: &str, ctx: &ClassificationContext) {
        if ctx.intent == Intent::Achievement {
            self.last_achievement = Some(message.to_string());
        }
        self.last_intent = Some(ctx.intent);
        self.last_emotion = Some(ctx.emotion);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(ConversationTurn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(ConversationTurn::assistant(content));
    }

    /// Returns the memory hint for this turn, at most once per session.
    ///
    /// Intent hints take priority; emotion hints only apply when the latest
    /// emotion is positive or negative and matches `current_emotion`.
    pub fn take_memory_hint(&mut self, current_emotion: Mood, enabled: bool) -> Option<String> {
        if !enabled || self.memory_hint_shown {
            return None;
        }

        let hint = match self.last_intent.and_then(intent_hint) {
            Some(hint) => {
                let mut hint = hint.to_string();
                if self.last_intent == Some(Intent::Achievement) {
                    if let Some(achievement) = &self.last_achievement {
                        hint.push_str(&achievement_reference(achievement));
                    }
                }
                Some(hint)
            }
            None => match self.last_emotion {
                Some(Mood::Positive) if current_emotion == Mood::Positive => {
                    Some("I’m glad to hear your energy is up.".to_string())
                }
                Some(Mood::Negative) if current_emotion == Mood::Negative => {
                    Some("I’m keeping things gentle since it sounded tough earlier.".to_string())
                }
                _ => None,
            },
        };

        if hint.is_some() {
            self.memory_hint_shown = true;
        }
        hint
    }
}

fn intent_hint(intent: Intent) -> Option<&'static str> {
    match intent {
        Intent::Achievement => Some("Earlier you mentioned a win — congrats again."),
        Intent::Overwhelm => Some("Earlier you mentioned feeling overwhelmed."),
        Intent::Anger => Some("Earlier you mentioned feeling angry."),
        Intent::Tiredness => Some("Earlier you mentioned feeling worn out."),
        Intent::Anxiety => Some("Earlier you mentioned feeling anxious."),
        _ => None,
    }
}

fn achievement_reference(achievement: &str) -> String {
    let snippet: String = achievement.chars().take(ACHIEVEMENT_SNIPPET_CHARS).collect();
    let ellipsis = if achievement.chars().count() > ACHIEVEMENT_SNIPPET_CHARS {
        "…"
    } else {
        ""
    };
    format!(" (about: ‘{}{}’)", snippet, ellipsis)
}

/// Prefixes `base` with the memory hint, if any.
pub fn compose_reply(hint: Option<&str>, base: &str) -> String {
    match hint {
        Some(hint) => format!("{} {}", hint, base).trim().to_string(),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(intent: Intent, emotion: Mood) -> ClassificationContext {
        ClassificationContext { intent, emotion }
    }

    #[test]
    fn intent_hint_is_shown_once() {
        let mut session = ChatSession::new();
        session.observe("so tired", &ctx(Intent::Tiredness, Mood::Neutral));
        assert_eq!(
            session.take_memory_hint(Mood::Neutral, true).as_deref(),
            Some("Earlier you mentioned feeling worn out.")
        );
        session.observe("still tired", &ctx(Intent::Tiredness, Mood::Neutral));
        assert_eq!(session.take_memory_hint(Mood::Neutral, true), None);
    }

    #[test]
    fn achievement_hint_quotes_the_message() {
        let mut session = ChatSession::new();
        session.observe("I shipped it", &ctx(Intent::Achievement, Mood::Neutral));
        assert_eq!(
            session.take_memory_hint(Mood::Neutral, true).as_deref(),
            Some("Earlier you mentioned a win — congrats again. (about: ‘I shipped it’)")
        );
    }

    #[test]
    fn long_achievements_are_truncated() {
        let long = "x".repeat(100);
        let mut session = ChatSession::new();
        session.observe(&long, &ctx(Intent::Achievement, Mood::Neutral));
        let hint = session.take_memory_hint(Mood::Neutral, true).unwrap();
        assert!(hint.ends_with(&format!("{}…’)", "x".repeat(80))));
    }

    #[test]
    fn emotion_hint_requires_a_matching_emotion() {
        let mut session = ChatSession::new();
        session.observe("lovely day", &ctx(Intent::None, Mood::Positive));
        assert_eq!(session.take_memory_hint(Mood::Neutral, true), None);
        assert!(!session.memory_hint_shown);
        assert_eq!(
            session.take_memory_hint(Mood::Positive, true).as_deref(),
            Some("I’m glad to hear your energy is up.")
        );
    }

    #[test]
    fn disabled_hints_do_not_consume_the_flag() {
        let mut session = ChatSession::new();
        session.observe("furious", &ctx(Intent::Anger, Mood::Negative));
        assert_eq!(session.take_memory_hint(Mood::Negative, false), None);
        assert!(!session.memory_hint_shown);
    }

    #[test]
    fn neutral_turns_without_hint_intents_get_nothing() {
        let mut session = ChatSession::new();
        session.observe("hello", &ctx(Intent::Greet, Mood::Neutral));
        assert_eq!(session.take_memory_hint(Mood::Neutral, true), None);
    }

    #[test]
    fn compose_prefixes_the_hint() {
        assert_eq!(compose_reply(Some("Hint."), "Reply."), "Hint. Reply.");
        assert_eq!(compose_reply(None, "Reply."), "Reply.");
    }
}
