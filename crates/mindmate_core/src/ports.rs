//! crates/mindmate_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use crate::aggregator::MoodSeries;
use crate::domain::{ConversationTurn, JournalEntry, Mood, MoodObservation, MoodSignal, SignalSource};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::time::Duration;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The append-only journal and mood-signal store.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Journal Entries ---
    async fn create_journal_entry(
        &self,
        recorded_at: NaiveDateTime,
        content: &str,
        mood: Mood,
        polarity: f64,
    ) -> PortResult<JournalEntry>;

    /// Stores a journal entry together with its journal-sourced mood signal,
    /// both stamped `recorded_at`. Either both rows are written or neither is.
    async fn record_journal_entry(
        &self,
        recorded_at: NaiveDateTime,
        content: &str,
        mood: Mood,
        polarity: f64,
    ) -> PortResult<JournalEntry>;

    /// Newest first.
    async fn get_recent_journal_entries(&self, limit: usize) -> PortResult<Vec<JournalEntry>>;

    /// Every journal entry's mood, oldest first.
    async fn get_journal_moods(&self) -> PortResult<Vec<MoodObservation>>;

    // --- Mood Signals ---
    async fn create_mood_signal(
        &self,
        recorded_at: NaiveDateTime,
        source: SignalSource,
        content: &str,
        mood: Mood,
        polarity: f64,
    ) -> PortResult<MoodSignal>;

    /// Mood signals from the given sources, oldest first.
    /// An empty slice selects every source.
    async fn get_mood_signals(&self, sources: &[SignalSource]) -> PortResult<Vec<MoodObservation>>;
}

#[async_trait]
pub trait GenerativeTextService: Send + Sync {
    /// A short name for log lines, e.g. "openai".
    fn provider_name(&self) -> &str;

    /// Completes a conversation. The first message is the system instruction.
    async fn complete(&self, messages: &[ConversationTurn]) -> PortResult<String>;
}

pub trait ChartRenderingService: Send + Sync {
    /// Renders a non-empty series as a line chart named `artifact_name` and
    /// returns a reference to the written artifact.
    fn render_line_chart(&self, series: &MoodSeries, artifact_name: &str) -> PortResult<String>;
}
