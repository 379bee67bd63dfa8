//! services/api/src/web/journal_task.rs
//!
//! Saves journal entries and lists the most recent ones.

use crate::web::state::AppState;
use mindmate_core::{
    domain::{local_now, JournalEntry},
    polarity::analyze_entry,
    ports::PortResult,
    suggestions::suggestion_for,
};
use std::sync::Arc;
use tracing::info;

/// Shown when the submitted entry is blank.
pub const EMPTY_ENTRY_PROMPT: &str = "What's on your mind today?";

/// How many entries the recent list shows.
pub const RECENT_ENTRY_LIMIT: usize = 5;

/// Characters of an entry shown in the recent list.
pub const PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq)]
pub enum JournalOutcome {
    Saved {
        entry: JournalEntry,
        suggestion: &'static str,
    },
    /// Nothing was written; carries the prompt to show instead.
    Skipped { prompt: &'static str },
}

/// Scores and stores a journal entry, plus a matching journal mood signal.
pub async fn submit_entry(app_state: Arc<AppState>, content: &str) -> PortResult<JournalOutcome> {
    if content.trim().is_empty() {
        return Ok(JournalOutcome::Skipped {
            prompt: EMPTY_ENTRY_PROMPT,
        });
    }

    let (mood, polarity) = analyze_entry(content);
    let recorded_at = local_now();

    let entry = app_state
        .db
        .record_journal_entry(recorded_at, content, mood, polarity)
        .await?;

    info!("Journal entry {} saved: mood={}, polarity={:.2}", entry.id, mood, polarity);
    Ok(JournalOutcome::Saved {
        entry,
        suggestion: suggestion_for(mood),
    })
}

/// The newest journal entries, newest first.
pub async fn recent_entries(app_state: Arc<AppState>) -> PortResult<Vec<JournalEntry>> {
    app_state.db.get_recent_journal_entries(RECENT_ENTRY_LIMIT).await
}

/// Truncates `content` to `PREVIEW_CHARS` characters, adding an ellipsis when cut.
pub fn preview(content: &str) -> String {
    let mut preview: String = content.chars().take(PREVIEW_CHARS).collect();
    if content.chars().count() > PREVIEW_CHARS {
        preview.push('…');
    }
    preview
}
