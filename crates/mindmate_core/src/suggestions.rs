//! crates/mindmate_core/src/suggestions.rs
//!
//! Short, non-medical suggestions shown after a journal entry is saved.

use crate::domain::Mood;

pub fn suggestion_for(mood: Mood) -> &'static str {
    match mood {
        Mood::Positive => {
            "Keep up the positive energy! Consider writing down three things you're grateful for."
        }
        Mood::Negative => {
            "It might help to take a few deep breaths or go for a short walk. Reflect on what made you feel this way."
        }
        Mood::Neutral => "Perhaps try a short meditation or note one thing that went well today.",
    }
}
