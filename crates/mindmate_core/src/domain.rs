//! crates/mindmate_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These types are independent of any database or serialization format.

use chrono::{Local, NaiveDateTime, SubsecRound};
use std::fmt;
use std::str::FromStr;

/// The textual timestamp format used for every persisted record.
/// It sorts lexicographically in chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the current local wall-clock time at second precision.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

//=========================================================================================
// Mood / Emotion Labels
//=========================================================================================

/// The coarse sentiment category assigned to a text sample.
///
/// The same three labels are used for the chat emotion and the journal mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Positive,
    Negative,
    Neutral,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Positive => "positive",
            Mood::Negative => "negative",
            Mood::Neutral => "neutral",
        }
    }

    /// Maps a stored label to a mood, ignoring case. Unknown labels are neutral.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "positive" => Mood::Positive,
            "negative" => Mood::Negative,
            _ => Mood::Neutral,
        }
    }

    /// The value plotted on the mood trend chart.
    pub fn chart_value(&self) -> i8 {
        match self {
            Mood::Positive => 1,
            Mood::Neutral => 0,
            Mood::Negative => -1,
        }
    }

    /// The polarity persisted for a chat turn with this emotion.
    pub fn signal_polarity(&self) -> f64 {
        f64::from(self.chart_value())
    }

    /// Maps a polarity onto a label using symmetric thresholds.
    /// Values exactly on a threshold are neutral.
    pub fn from_polarity(polarity: f64, threshold: f64) -> Self {
        if polarity > threshold {
            Mood::Positive
        } else if polarity < -threshold {
            Mood::Negative
        } else {
            Mood::Neutral
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================================
// Intents
//=========================================================================================

/// A closed-set tag describing the conversational purpose of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Achievement,
    Gratitude,
    Apology,
    Anger,
    Tiredness,
    Overwhelm,
    Confusion,
    Loneliness,
    Anxiety,
    Journal,
    Breathing,
    Capability,
    Greet,
    None,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Achievement => "achievement",
            Intent::Gratitude => "gratitude",
            Intent::Apology => "apology",
            Intent::Anger => "anger",
            Intent::Tiredness => "tiredness",
            Intent::Overwhelm => "overwhelm",
            Intent::Confusion => "confusion",
            Intent::Loneliness => "loneliness",
            Intent::Anxiety => "anxiety",
            Intent::Journal => "journal",
            Intent::Breathing => "breathing",
            Intent::Capability => "capability",
            Intent::Greet => "greet",
            Intent::None => "none",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The transient result of classifying a single piece of input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationContext {
    pub emotion: Mood,
    pub intent: Intent,
}

impl Default for ClassificationContext {
    fn default() -> Self {
        Self {
            emotion: Mood::Neutral,
            intent: Intent::None,
        }
    }
}

//=========================================================================================
// Conversation
//=========================================================================================

/// Who authored a message sent to the generative text service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message in a chat session, or in a prompt sent to the generative service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// How long the generative service's replies should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyStyle {
    Concise,
    #[default]
    Detailed,
}

impl ReplyStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyStyle::Concise => "concise",
            ReplyStyle::Detailed => "detailed",
        }
    }
}

impl FromStr for ReplyStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concise" => Ok(ReplyStyle::Concise),
            "detailed" => Ok(ReplyStyle::Detailed),
            other => Err(format!("'{}' is not a reply style (concise|detailed)", other)),
        }
    }
}

//=========================================================================================
// Persisted Records
//=========================================================================================

/// Where a mood signal was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalSource {
    Chat,
    Journal,
}

impl SignalSource {
    pub const ALL: [SignalSource; 2] = [SignalSource::Chat, SignalSource::Journal];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalSource::Chat => "chat",
            SignalSource::Journal => "journal",
        }
    }
}

impl FromStr for SignalSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chat" => Ok(SignalSource::Chat),
            "journal" => Ok(SignalSource::Journal),
            other => Err(format!("'{}' is not a mood signal source", other)),
        }
    }
}

/// A journal entry written by the user. Immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub id: i64,
    pub recorded_at: NaiveDateTime,
    pub content: String,
    pub mood: Mood,
    pub polarity: f64,
}

/// A timestamped, source-tagged sentiment observation used for trend charting.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodSignal {
    pub id: i64,
    pub recorded_at: NaiveDateTime,
    pub source: SignalSource,
    pub content: String,
    pub mood: Mood,
    pub polarity: f64,
}

/// A (timestamp, raw label) pair read back from the store for aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodObservation {
    pub recorded_at: NaiveDateTime,
    pub label: String,
}
